use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("course not found: {0}")]
    CourseNotFound(String),

    #[error("unknown node label '{label}' on node {id}")]
    UnknownLabel { id: String, label: String },

    #[error("edge references unknown node: {0}")]
    UnknownNode(String),

    #[error("node {id} is missing required property '{property}'")]
    MissingProperty { id: String, property: String },

    #[error("tree is empty")]
    EmptyTree,

    #[error("tree root is not a Course node (junction index {0})")]
    RootNotCourse(i64),

    #[error("graph source failure: {0}")]
    Source(String),
}

pub type TreeResult<T> = Result<T, TreeError>;
