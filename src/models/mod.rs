pub mod search_result;
pub mod uploaded_file;

pub use search_result::{MapPayload, SearchResult, UserLocation};
pub use uploaded_file::UploadedFile;
