use std::borrow::Cow;

use brain_core::control::ControlError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub(crate) fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Maps control-plane failures onto MCP error codes, keeping the message.
pub(crate) fn map_err(err: ControlError) -> ErrorData {
    let code = match &err {
        ControlError::Validation(_) => ErrorCode::INVALID_PARAMS,
        ControlError::NotFound { .. } => ErrorCode::RESOURCE_NOT_FOUND,
        ControlError::Store(_) => ErrorCode::INTERNAL_ERROR,
    };
    mcp_err(code, err.to_string())
}

#[cfg(test)]
mod tests {
    use brain_core::store::StoreError;

    use super::*;

    #[test]
    fn store_failures_are_internal_errors() {
        let err = map_err(ControlError::Store(StoreError::Constraint(
            "target idea not found: ghost".to_string(),
        )));
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("ghost"));
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = map_err(ControlError::NotFound {
            entity: "insight",
            id: "abc".to_string(),
        });
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert_eq!(err.message, "insight not found: abc");
    }
}
