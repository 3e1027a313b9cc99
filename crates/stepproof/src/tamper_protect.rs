use std::fmt::Write;

use log::{debug, warn};
use sha3::{Digest, Sha3_256};

const SEAL_SALT: &str = "i understand that modifying this object may lead to incorrect proofs";

/// A state that travels through the client and must come back unmodified.
///
/// `compute_seal_info` renders every semantically relevant field in a fixed
/// order. The seal itself is never part of that rendering.
pub trait ProtectedState {
    fn compute_seal_info(&self) -> String;

    fn seal(&self) -> &str;

    fn set_seal(&mut self, seal: String);

    fn compute_seal(&mut self) {
        let s = seal(&self.compute_seal_info());
        debug!("sealed state as {}", s);
        self.set_seal(s);
    }

    fn verify_seal(&self) -> bool {
        let ok = verify(&self.compute_seal_info(), self.seal());
        if !ok {
            warn!("state seal mismatch, rejecting state");
        }
        ok
    }
}

pub fn seal(info: &str) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(SEAL_SALT.as_bytes());
    hasher.update(b"|");
    hasher.update(info.as_bytes());
    let digest = hasher.finalize();

    let mut s = String::with_capacity(digest.len() * 2);
    for b in digest {
        // writing to a String cannot fail
        let _ = write!(s, "{:02X}", b);
    }
    s
}

pub fn verify(info: &str, hash: &str) -> bool {
    seal(info) == hash
}
