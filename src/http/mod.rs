pub mod call_result;
pub mod invoker;

pub use call_result::{
    CallResult, ObjectKeyMapping, STATUS_JOB_ID_MISMATCH, STATUS_NO_AUTH, STATUS_TRANSPORT_FAILURE,
};
pub use invoker::{merge_headers, HttpInvoker, HttpMethod};
