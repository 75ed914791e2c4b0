mod messages;

pub use messages::{
    EMPTY_INPUT_MESSAGE, ErrorStatus, GENERATION_FAILED_MESSAGE, QueryRequest, QueryResponse,
};
