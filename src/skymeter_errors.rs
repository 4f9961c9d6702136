use thiserror::Error;

use crate::schema::FieldType;

#[derive(Error, Debug)]
pub enum SkymeterError {
    #[error("Unknown measurement algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Field not found: {name:?} (component {component:?})")]
    FieldNotFound { name: String, component: String },

    #[error("Index {index} is out of range for {name}[0,{}]", .arity.saturating_sub(1))]
    ArrayIndexOutOfRange { name: String, index: u32, arity: u32 },

    #[error("Index {offset} out of range [0,{capacity}] for {name}")]
    SlotOutOfRange {
        name: String,
        offset: i64,
        capacity: usize,
    },

    #[error("Type mismatch for {name}: declared {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: FieldType,
        actual: FieldType,
    },

    #[error("Record slot {offset} was never populated before freeze")]
    IncompleteRecord { offset: usize },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for SkymeterError {
    fn eq(&self, other: &Self) -> bool {
        use SkymeterError::*;
        match (self, other) {
            (UnknownAlgorithm(a), UnknownAlgorithm(b)) => a == b,
            (
                FieldNotFound {
                    name: a,
                    component: ca,
                },
                FieldNotFound {
                    name: b,
                    component: cb,
                },
            ) => a == b && ca == cb,
            (
                ArrayIndexOutOfRange {
                    name: a,
                    index: ia,
                    arity: da,
                },
                ArrayIndexOutOfRange {
                    name: b,
                    index: ib,
                    arity: db,
                },
            ) => a == b && ia == ib && da == db,
            (
                SlotOutOfRange {
                    name: a,
                    offset: oa,
                    capacity: ca,
                },
                SlotOutOfRange {
                    name: b,
                    offset: ob,
                    capacity: cb,
                },
            ) => a == b && oa == ob && ca == cb,
            (
                TypeMismatch {
                    name: a,
                    expected: ea,
                    actual: aa,
                },
                TypeMismatch {
                    name: b,
                    expected: eb,
                    actual: ab,
                },
            ) => a == b && ea == eb && aa == ab,
            (IncompleteRecord { offset: a }, IncompleteRecord { offset: b }) => a == b,

            // I/O errors are not comparable: equal if same variant
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
