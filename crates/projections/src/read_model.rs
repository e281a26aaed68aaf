/// Common interface for queryable read models.
pub trait ReadModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Number of records currently held.
    fn count(&self) -> usize;
}
