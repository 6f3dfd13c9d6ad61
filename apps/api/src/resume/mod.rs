// Resume storage: PDF uploads kept in S3, one current resume per user.

pub mod handlers;
pub mod storage;
