//! Semantic checks that run while a construct is being parsed, so failures
//! carry the position of the offending parameter or field.

use super::ast::{Expr, Literal, Param, TypeAnnotation};

/// Tracks whether an optional or defaulted parameter has been seen in the
/// current parameter list.
#[derive(Debug, Default)]
pub struct ParamOrder {
    seen_optional: bool,
}

impl ParamOrder {
    /// Admit the next parameter, rejecting a required one after any optional one.
    pub fn admit(&mut self, param: &Param) -> Result<(), String> {
        if param.required && self.seen_optional {
            return Err(format!("required parameter '{}' cannot come after optional parameters", param.name));
        }
        if param.is_optional() {
            self.seen_optional = true;
        }
        Ok(())
    }
}

/// Check a literal default against a primitive annotation.
///
/// Only literal defaults are checked. Computed defaults, `null`, and
/// non-primitive annotations pass untouched.
pub fn check_default(name: &str, ty: &TypeAnnotation, default: &Expr) -> Result<(), String> {
    let Some(literal) = default.as_literal() else {
        return Ok(());
    };
    let expected = match ty {
        TypeAnnotation::Int => "int",
        TypeAnnotation::Float => "float",
        TypeAnnotation::Str => "string",
        TypeAnnotation::Bool => "bool",
        _ => return Ok(()),
    };
    let compatible = matches!(
        (ty, literal),
        (_, Literal::Null)
            | (TypeAnnotation::Int, Literal::Int(_))
            | (TypeAnnotation::Float, Literal::Float(_))
            | (TypeAnnotation::Str, Literal::Str(_))
            | (TypeAnnotation::Bool, Literal::Bool(_))
    );
    if compatible {
        Ok(())
    } else {
        Err(format!(
            "default value type mismatch for '{name}': expects {expected}, got {}",
            literal.kind_name()
        ))
    }
}
