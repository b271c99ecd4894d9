pub mod quota_source;

pub use quota_source::QuotaSource;
