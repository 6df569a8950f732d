/// A candidate photo as received from the browser, before it is stored.
#[derive(Debug, Clone)]
pub struct Photo {
    /// Unsanitized; the uploader decides the stored name.
    pub filename: String,
    pub content: Vec<u8>,
    pub election_id: i32,
}
