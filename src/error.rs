use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Not a git repository: {0}")]
    NotARepository(String),
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("Summarizer configuration error: {0}")]
    SummarizerConfig(String),
    #[error("Summarizer transport error: {0}")]
    SummarizerTransport(String),
    #[error("Summarizer upstream error: {0}")]
    SummarizerUpstream(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] gix::objs::decode::Error),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::reference::find::existing::Error> for ReportError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        ReportError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for ReportError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        ReportError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for ReportError {
    fn from(err: gix::object::commit::Error) -> Self {
        ReportError::Commit(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for ReportError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        ReportError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for ReportError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        ReportError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for ReportError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        ReportError::DiffTreeToTree(Box::new(err))
    }
}
