/// Source of unguessable tokens for `state`, `nonce` and session keys.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self, size: usize) -> String;
}
