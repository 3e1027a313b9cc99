use std::convert::TryFrom;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TableauxType;
use crate::clause::{Atom, ClauseSet};
use crate::parse::{parse_prop_clauses, CNFStrategy, ParseErr};
use crate::tamper_protect::ProtectedState;
use crate::{Calculus, CloseMsg, ErrorKind, Symbol};

pub type PropTabResult<T> = Result<T, Err>;

const ROOT: usize = 0;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Err {
    #[error(transparent)]
    Parse(#[from] ParseErr),
    #[error("Invalid tamper protection seal, the proof state has been modified")]
    IntegrityViolation,
    #[error("Node with ID {0} does not exist")]
    InvalidNodeId(usize),
    #[error("Clause with ID {0} does not exist")]
    InvalidClauseId(usize),
    #[error("Backtracking is not enabled for this proof")]
    Backtracking,
    #[error("Can't undo in initial state")]
    BacktrackingEmpty,
    #[error("The move history is inconsistent with the proof tree at node {0}")]
    CorruptHistory(usize),
    #[error("The proof tree is currently not sufficiently connected at node {0}, please close branches first to restore connectedness before expanding more leaves")]
    NotConnected(usize),
    #[error("Node {0} is not a leaf")]
    ExpectedLeaf(usize),
    #[error("Node '{0}' is not the root of a closed subtree")]
    ExpectedClosed(usize),
    #[error("Node '{0}' is already closed")]
    AlreadyClosed(usize),
    #[error("Expanding clause {clause} at leaf {leaf} would introduce a duplicate node '{atom}' on the branch, making the tree irregular")]
    WouldMakeIrregular {
        atom: String,
        leaf: usize,
        clause: usize,
    },
    #[error("Adding lemma '{atom}' at leaf {leaf} would introduce a duplicate node on the branch, making the tree irregular")]
    IrregularLemma { atom: String, leaf: usize },
    #[error("No literal introduced at leaf {0} would be closeable, making the tree unconnected")]
    WouldMakeUnconnected(usize),
    #[error("No literal introduced at leaf {leaf} would be closeable with '{atom}', making the tree not strongly connected")]
    WouldMakeNotStronglyConnected { atom: String, leaf: usize },
    #[error("Root node cannot be used for lemma creation at leaf {0}")]
    LemmaRoot(usize),
    #[error("Cannot create lemma from a leaf: {0}")]
    LemmaLeaf(usize),
    #[error("Nodes '{0}' and '{1}' are not siblings")]
    ExpectedSiblings(usize, usize),
    #[error("Leaf '{0}' and node '{1}' do not reference the same literal")]
    ExpectedSameSpelling(usize, usize),
    #[error("Leaf '{0}' and node '{1}' reference the same literal, but neither of them are negated")]
    CloseBothPos(usize, usize),
    #[error("Leaf '{0}' and node '{1}' reference the same literal, but both of them are negated")]
    CloseBothNeg(usize, usize),
    #[error("Node '{0}' is not an ancestor of leaf '{1}'")]
    ExpectedParent(usize, usize),
    #[error("Leaf {0} cannot be closed against the root node")]
    CloseRoot(usize),
    #[error("Node {0} is inconsistent with the structure of the proof tree")]
    MalformedTree(usize),
}

impl Err {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Err::Parse(_) => ErrorKind::Parse,
            Err::IntegrityViolation | Err::MalformedTree(_) => ErrorKind::IntegrityViolation,
            _ => ErrorKind::InvalidMove,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Params {
    #[serde(rename = "type")]
    pub tab_type: TableauxType,
    pub regular: bool,
    pub backtracking: bool,
    #[serde(rename = "cnfStrategy")]
    pub cnf_strategy: CNFStrategy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct State {
    #[serde(rename = "clauseSet")]
    clause_set: ClauseSet<Symbol>,
    #[serde(rename = "type")]
    ty: TableauxType,
    regular: bool,
    backtracking: bool,
    #[serde(rename = "tree")]
    nodes: Vec<Node>,
    #[serde(rename = "moveHistory")]
    moves: Vec<Move>,
    #[serde(rename = "usedBacktracking")]
    used_backtracking: bool,
    seal: String,
}

impl ProtectedState for State {
    fn compute_seal_info(&self) -> String {
        let nodes: Vec<String> = self.nodes.iter().map(Node::info).collect();
        let history: Vec<String> = self.moves.iter().map(Move::to_string).collect();
        format!(
            "tableauxstate|{}|{}|{}|{}|{}|[{}]|[{}]",
            self.ty,
            self.regular,
            self.backtracking,
            self.used_backtracking,
            self.clause_set,
            nodes.join("|"),
            history.join(",")
        )
    }

    fn seal(&self) -> &str {
        &self.seal
    }

    fn set_seal(&mut self, seal: String) {
        self.seal = seal;
    }
}

impl State {
    /// Starts a sealed proof over `clause_set` with a single `true` root.
    pub fn new(clause_set: ClauseSet<Symbol>, params: Params) -> Self {
        let mut state = Self {
            clause_set,
            ty: params.tab_type,
            regular: params.regular,
            backtracking: params.backtracking,
            nodes: vec![Node::new(None, Symbol::intern("true"), false, None)],
            moves: vec![],
            used_backtracking: false,
            seal: String::new(),
        };
        state.compute_seal();
        state
    }

    pub fn clause_set(&self) -> &ClauseSet<Symbol> {
        &self.clause_set
    }

    pub fn tableaux_type(&self) -> TableauxType {
        self.ty
    }

    pub fn is_regular(&self) -> bool {
        self.regular
    }

    pub fn backtracking(&self) -> bool {
        self.backtracking
    }

    pub fn used_backtracking(&self) -> bool {
        self.used_backtracking
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn history(&self) -> &[Move] {
        &self.moves
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: usize) -> PropTabResult<&Node> {
        self.nodes.get(id).ok_or(Err::InvalidNodeId(id))
    }

    /// Strict ancestors of `id`, nearest first, ending with the root.
    fn ancestors(&self, id: usize) -> Ancestors<'_> {
        Ancestors {
            nodes: &self.nodes,
            next: self.nodes[id].parent,
        }
    }

    fn is_ancestor(&self, ancestor: usize, id: usize) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// A leaf is closable if some non-root ancestor carries its negation.
    fn node_is_closable(&self, id: usize) -> bool {
        let node = &self.nodes[id];
        let neg = node.to_atom().not();
        node.is_leaf()
            && self
                .ancestors(id)
                .any(|a| a != ROOT && self.nodes[a].to_atom() == neg)
    }

    fn node_is_directly_closable(&self, id: usize) -> bool {
        let node = &self.nodes[id];
        match node.parent {
            Some(p) if p != ROOT => {
                node.is_leaf() && node.to_atom().is_negation_of(&self.nodes[p].to_atom())
            }
            _ => false,
        }
    }

    fn mark_node_closed(&mut self, leaf: usize) {
        self.nodes[leaf].is_closed = true;

        let mut next = self.nodes[leaf].parent;
        while let Some(id) = next {
            if !self.all_children_closed(id) {
                break;
            }
            self.nodes[id].is_closed = true;
            next = self.nodes[id].parent;
        }
    }

    fn all_children_closed(&self, node_id: usize) -> bool {
        self.nodes[node_id]
            .children
            .iter()
            .all(|c| self.nodes[*c].is_closed)
    }

    /// True iff the root is closed.
    pub fn is_closed(&self) -> bool {
        self.nodes.first().map_or(false, Node::is_closed)
    }

    pub fn get_close_msg(&self) -> CloseMsg {
        let closed = self.is_closed();
        let msg = if closed {
            "The proof is closed"
        } else {
            "The proof tree is not closed"
        };

        CloseMsg {
            closed,
            msg: msg.to_string(),
        }
    }

    /// Describes the kind of tableaux a closed proof is valid in, e.g.
    /// "weakly connected regular tableaux without backtracking".
    pub fn proof_summary(&self) -> Option<String> {
        if !self.is_closed() {
            return None;
        }
        let regularity = if check_regularity(self) {
            "regular "
        } else {
            ""
        };
        let backtracking = if self.used_backtracking {
            "with"
        } else {
            "without"
        };
        Some(format!(
            "{} {}tableaux {} backtracking",
            self.ty.describe(),
            regularity,
            backtracking
        ))
    }

    fn get_lemma(&self, leaf_id: usize, lemma_id: usize) -> PropTabResult<Atom<Symbol>> {
        let leaf = self.node(leaf_id)?;
        let lemma = self.node(lemma_id)?;

        if !leaf.is_leaf() {
            return Err(Err::ExpectedLeaf(leaf_id));
        }
        if leaf.is_closed() {
            return Err(Err::AlreadyClosed(leaf_id));
        }

        let common_parent = match lemma.parent {
            Some(p) => p,
            None => return Err(Err::LemmaRoot(leaf_id)),
        };
        if !lemma.is_closed() {
            return Err(Err::ExpectedClosed(lemma_id));
        }
        if lemma.is_leaf() {
            return Err(Err::LemmaLeaf(lemma_id));
        }

        // The lemma subtree has to hang off the leaf's branch without
        // containing the leaf itself.
        if self.is_ancestor(lemma_id, leaf_id) || !self.is_ancestor(common_parent, leaf_id) {
            return Err(Err::ExpectedSiblings(leaf_id, lemma_id));
        }

        let atom = lemma.to_atom().not();

        if self.regular && find_branch_duplicate(self, leaf_id, std::slice::from_ref(&atom)).is_some() {
            return Err(Err::IrregularLemma {
                atom: atom.to_string(),
                leaf: leaf_id,
            });
        }

        Ok(atom)
    }
}

struct Ancestors<'s> {
    nodes: &'s [Node],
    next: Option<usize>,
}

impl<'s> Iterator for Ancestors<'s> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let id = self.next?;
        self.next = self.nodes[id].parent;
        Some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    parent: Option<usize>,
    spelling: Symbol,
    negated: bool,
    lemma_source: Option<usize>,
    is_closed: bool,
    close_ref: Option<usize>,
    children: Vec<usize>,
}

impl Node {
    fn new(parent: Option<usize>, spelling: Symbol, negated: bool, lemma_source: Option<usize>) -> Self {
        Self {
            parent,
            spelling,
            negated,
            lemma_source,
            is_closed: false,
            close_ref: None,
            children: vec![],
        }
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn spelling(&self) -> Symbol {
        self.spelling
    }

    pub fn negated(&self) -> bool {
        self.negated
    }

    pub fn lemma_source(&self) -> Option<usize> {
        self.lemma_source
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn close_ref(&self) -> Option<usize> {
        self.close_ref
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn to_atom(&self) -> Atom<Symbol> {
        Atom::new(self.spelling, self.negated)
    }

    fn info(&self) -> String {
        fn opt(id: Option<usize>, none: &str) -> String {
            id.map_or_else(|| none.to_string(), |i| i.to_string())
        }

        let children: Vec<String> = self.children.iter().map(usize::to_string).collect();
        format!(
            "{};{};{};{};{};{};{};({})",
            self.spelling,
            if self.negated { "n" } else { "p" },
            opt(self.parent, "null"),
            opt(self.close_ref, "-"),
            opt(self.lemma_source, "-"),
            if self.is_leaf() { "l" } else { "i" },
            if self.is_closed { "c" } else { "o" },
            children.join(",")
        )
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_atom())
    }
}

/// A tableaux move. Ids are node ids, except the second id of
/// `Expand`, which is a clause id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMove", into = "RawMove")]
pub enum Move {
    Expand(usize, usize),
    Close(usize, usize),
    Lemma(usize, usize),
    Undo,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Expand(l, c) => write!(f, "Expand({},{})", l, c),
            Move::Close(l, n) => write!(f, "Close({},{})", l, n),
            Move::Lemma(l, n) => write!(f, "Lemma({},{})", l, n),
            Move::Undo => write!(f, "Undo"),
        }
    }
}

/// Wire shape of a move: `{"type": "tableaux-expand", "id1": 0, "id2": 1}`.
#[derive(Serialize, Deserialize)]
struct RawMove {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id1: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id2: Option<usize>,
}

impl TryFrom<RawMove> for Move {
    type Error = String;

    fn try_from(raw: RawMove) -> Result<Self, Self::Error> {
        if raw.ty == "tableaux-undo" {
            return Ok(Move::Undo);
        }

        let ids = raw.id1.zip(raw.id2);
        let (id1, id2) = ids.ok_or_else(|| format!("Move '{}' requires id1 and id2", raw.ty))?;
        match raw.ty.as_str() {
            "tableaux-expand" => Ok(Move::Expand(id1, id2)),
            "tableaux-close" => Ok(Move::Close(id1, id2)),
            "tableaux-lemma" => Ok(Move::Lemma(id1, id2)),
            ty => Err(format!("Unknown move type '{}'", ty)),
        }
    }
}

impl From<Move> for RawMove {
    fn from(m: Move) -> Self {
        let (ty, ids) = match m {
            Move::Expand(a, b) => ("tableaux-expand", Some((a, b))),
            Move::Close(a, b) => ("tableaux-close", Some((a, b))),
            Move::Lemma(a, b) => ("tableaux-lemma", Some((a, b))),
            Move::Undo => ("tableaux-undo", None),
        };
        RawMove {
            ty: ty.to_string(),
            id1: ids.map(|(a, _)| a),
            id2: ids.map(|(_, b)| b),
        }
    }
}

pub struct PropTableaux;

impl<'f> Calculus<'f> for PropTableaux {
    type Params = Params;
    type State = State;
    type Move = Move;
    type Error = Err;

    fn parse_formula(formula: &'f str, params: Option<Self::Params>) -> PropTabResult<Self::State> {
        let params = params.unwrap_or_default();
        let clauses = parse_prop_clauses(formula, params.cnf_strategy)?;
        Ok(State::new(clauses, params))
    }

    fn validate(state: &Self::State) -> bool {
        state.verify_seal() && check_tree(state).is_ok()
    }

    fn apply_move(state: &Self::State, k_move: Self::Move) -> PropTabResult<Self::State> {
        if !state.verify_seal() {
            return Err(Err::IntegrityViolation);
        }
        check_tree(state)?;
        debug!("applying {} to tableaux with {} nodes", k_move, state.nodes.len());

        let working = state.clone();
        let mut state = match k_move {
            Move::Expand(leaf, clause) => apply_expand(working, leaf, clause),
            Move::Close(leaf, node) => apply_close(working, leaf, node),
            Move::Lemma(leaf, lemma) => apply_lemma(working, leaf, lemma),
            Move::Undo => apply_undo(working),
        }?;
        state.compute_seal();
        Ok(state)
    }

    fn check_close(state: &Self::State) -> PropTabResult<CloseMsg> {
        if !state.verify_seal() {
            return Err(Err::IntegrityViolation);
        }
        check_tree(state)?;
        Ok(state.get_close_msg())
    }
}

fn apply_expand(mut state: State, leaf_id: usize, clause_id: usize) -> PropTabResult<State> {
    ensure_expandable(&state, leaf_id, clause_id)?;

    let atoms: Vec<Atom<Symbol>> = state.clause_set.clauses()[clause_id].atoms().to_vec();
    for atom in atoms {
        let id = state.nodes.len();
        state
            .nodes
            .push(Node::new(Some(leaf_id), *atom.lit(), atom.negated(), None));
        state.nodes[leaf_id].children.push(id);
    }

    verify_expand_connectedness(&state, leaf_id)?;

    if state.backtracking {
        state.moves.push(Move::Expand(leaf_id, clause_id));
    }

    Ok(state)
}

fn apply_close(mut state: State, leaf_id: usize, node_id: usize) -> PropTabResult<State> {
    ensure_basic_closeability(&state, leaf_id, node_id)?;

    state.nodes[leaf_id].close_ref = Some(node_id);
    state.mark_node_closed(leaf_id);

    if state.backtracking {
        state.moves.push(Move::Close(leaf_id, node_id));
    }

    Ok(state)
}

fn apply_lemma(mut state: State, leaf_id: usize, lemma_id: usize) -> PropTabResult<State> {
    let atom = state.get_lemma(leaf_id, lemma_id)?;

    let id = state.nodes.len();
    state
        .nodes
        .push(Node::new(Some(leaf_id), *atom.lit(), atom.negated(), Some(lemma_id)));
    state.nodes[leaf_id].children.push(id);

    verify_expand_connectedness(&state, leaf_id)?;

    if state.backtracking {
        state.moves.push(Move::Lemma(leaf_id, lemma_id));
    }

    Ok(state)
}

fn apply_undo(mut state: State) -> PropTabResult<State> {
    if !state.backtracking {
        return Err(Err::Backtracking);
    }

    let last = state.moves.pop().ok_or(Err::BacktrackingEmpty)?;
    state.used_backtracking = true;

    match last {
        Move::Close(leaf, _) => undo_close(state, leaf),
        Move::Expand(leaf, _) | Move::Lemma(leaf, _) => undo_expand(state, leaf),
        Move::Undo => Err(Err::CorruptHistory(ROOT)),
    }
}

fn undo_close(mut state: State, leaf: usize) -> PropTabResult<State> {
    state.node(leaf)?;

    let mut next = Some(leaf);
    while let Some(id) = next {
        let node = &mut state.nodes[id];
        if !node.is_closed {
            break;
        }
        node.is_closed = false;
        next = node.parent;
    }

    state.nodes[leaf].close_ref = None;

    Ok(state)
}

fn undo_expand(mut state: State, leaf: usize) -> PropTabResult<State> {
    let children = state.node(leaf)?.children.len();
    let keep = state.nodes.len() - children;

    // Nodes are only ever appended, so the newest expansion owns the tail.
    if state.nodes[leaf].children.first().map_or(false, |&c| c != keep) {
        return Err(Err::CorruptHistory(leaf));
    }

    state.nodes[leaf].children.clear();
    state.nodes.truncate(keep);

    Ok(state)
}

fn ensure_expandable(state: &State, leaf_id: usize, clause_id: usize) -> PropTabResult<()> {
    if let Some(id) = find_unconnected_node(state, state.ty) {
        return Err(Err::NotConnected(id));
    }

    let leaf = state.node(leaf_id)?;
    let clause = state
        .clause_set
        .get(clause_id)
        .ok_or(Err::InvalidClauseId(clause_id))?;

    if !leaf.is_leaf() {
        return Err(Err::ExpectedLeaf(leaf_id));
    }
    if leaf.is_closed() {
        return Err(Err::AlreadyClosed(leaf_id));
    }

    if state.regular {
        if let Some(atom) = find_branch_duplicate(state, leaf_id, clause.atoms()) {
            return Err(Err::WouldMakeIrregular {
                atom: atom.to_string(),
                leaf: leaf_id,
                clause: clause_id,
            });
        }
    }

    if state.ty.is_strongly_connected()
        && leaf_id != ROOT
        && clause.find_negation_of(&leaf.to_atom()).is_none()
    {
        return Err(Err::WouldMakeNotStronglyConnected {
            atom: leaf.to_string(),
            leaf: leaf_id,
        });
    }

    Ok(())
}

fn ensure_basic_closeability(state: &State, leaf_id: usize, node_id: usize) -> PropTabResult<()> {
    let leaf = state.node(leaf_id)?;
    let node = state.node(node_id)?;

    if !leaf.is_leaf() {
        return Err(Err::ExpectedLeaf(leaf_id));
    }
    if leaf.is_closed {
        return Err(Err::AlreadyClosed(leaf_id));
    }
    if node_id == ROOT {
        return Err(Err::CloseRoot(leaf_id));
    }
    if !state.is_ancestor(node_id, leaf_id) {
        return Err(Err::ExpectedParent(node_id, leaf_id));
    }
    if leaf.spelling != node.spelling {
        return Err(Err::ExpectedSameSpelling(leaf_id, node_id));
    }

    match (leaf.negated, node.negated) {
        (true, true) => Err(Err::CloseBothNeg(leaf_id, node_id)),
        (false, false) => Err(Err::CloseBothPos(leaf_id, node_id)),
        _ => Ok(()),
    }
}

/// First atom of `atoms` already present on the branch ending in `leaf_id`.
fn find_branch_duplicate<'a>(
    state: &State,
    leaf_id: usize,
    atoms: &'a [Atom<Symbol>],
) -> Option<&'a Atom<Symbol>> {
    let branch: Vec<Atom<Symbol>> = std::iter::once(leaf_id)
        .chain(state.ancestors(leaf_id))
        .filter(|id| *id != ROOT)
        .map(|id| state.nodes[id].to_atom())
        .collect();

    atoms.iter().find(|a| branch.contains(a))
}

fn verify_expand_connectedness(state: &State, leaf_id: usize) -> PropTabResult<()> {
    if leaf_id == ROOT {
        return Ok(());
    }

    let leaf = &state.nodes[leaf_id];

    match state.ty {
        TableauxType::Unconnected => Ok(()),
        TableauxType::WeaklyConnected => {
            if leaf.children.iter().any(|id| state.node_is_closable(*id)) {
                Ok(())
            } else {
                Err(Err::WouldMakeUnconnected(leaf_id))
            }
        }
        TableauxType::StronglyConnected => {
            if leaf.children.iter().any(|id| state.node_is_directly_closable(*id)) {
                Ok(())
            } else {
                Err(Err::WouldMakeNotStronglyConnected {
                    atom: leaf.to_string(),
                    leaf: leaf_id,
                })
            }
        }
    }
}

/// First inner node below the root without a closed leaf child. In the
/// strong variant that child must be closed against the node itself.
fn find_unconnected_node(state: &State, ty: TableauxType) -> Option<usize> {
    if ty.is_unconnected() {
        return None;
    }
    let strong = ty.is_strongly_connected();
    state
        .root()
        .children
        .iter()
        .find_map(|id| find_unconnected_subtree(state, *id, strong))
}

fn find_unconnected_subtree(state: &State, root: usize, strong: bool) -> Option<usize> {
    let node = &state.nodes[root];
    if node.is_leaf() {
        return None;
    }

    let has_closed_child = node.children.iter().any(|id| {
        let child = &state.nodes[*id];
        child.is_leaf() && child.is_closed && (!strong || child.close_ref == Some(root))
    });
    if !has_closed_child {
        return Some(root);
    }

    node.children
        .iter()
        .find_map(|id| find_unconnected_subtree(state, *id, strong))
}

/// Parent and child links must describe a tree rooted at node 0 in
/// which every node sits after its parent.
fn check_tree(state: &State) -> PropTabResult<()> {
    let size = state.nodes.len();
    match state.nodes.first() {
        None => return Err(Err::MalformedTree(ROOT)),
        Some(root) if root.parent.is_some() => return Err(Err::MalformedTree(ROOT)),
        _ => {}
    }

    for (id, node) in state.nodes.iter().enumerate().skip(1) {
        if !node.parent.map_or(false, |p| p < id) {
            return Err(Err::MalformedTree(id));
        }
    }

    let mut listed = vec![false; size];
    for (id, node) in state.nodes.iter().enumerate() {
        for &child in &node.children {
            if child >= size || listed[child] || state.nodes[child].parent != Some(id) {
                return Err(Err::MalformedTree(id));
            }
            listed[child] = true;
        }
    }

    match listed.iter().skip(1).position(|l| !l) {
        Some(i) => Err(Err::MalformedTree(i + 1)),
        None => Ok(()),
    }
}

/// True iff no branch of the tree repeats a literal.
pub(crate) fn check_regularity(state: &State) -> bool {
    let mut branch = vec![];
    state
        .root()
        .children
        .iter()
        .all(|id| check_regularity_subtree(state, *id, &mut branch))
}

fn check_regularity_subtree(state: &State, id: usize, branch: &mut Vec<Atom<Symbol>>) -> bool {
    let node = &state.nodes[id];
    let atom = node.to_atom();
    if branch.contains(&atom) {
        return false;
    }

    branch.push(atom);
    let ok = node
        .children
        .iter()
        .all(|c| check_regularity_subtree(state, *c, branch));
    branch.pop();
    ok
}
