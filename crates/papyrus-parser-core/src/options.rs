//! Parser configuration.

/// Toggles for the handful of validations the grammar makes optional.
///
/// Every field defaults to the grammar's own default: on. Turning one off does not change how a
/// construct is parsed, only whether its associated semantic violation is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// The first statement in the file must be `ScriptName`.
    pub throw_scriptname_missing: bool,
    /// The `ScriptName` identifier must equal the supplied filename, case-insensitively.
    pub throw_scriptname_mismatch: bool,
    /// `Return` outside a function/event body is an error.
    pub throw_return_outside: bool,
    /// `If` outside a function/event body is an error.
    pub throw_if_outside: bool,
    /// `While` outside a function/event body is an error.
    pub throw_while_outside: bool,
    /// Binary/logical expressions outside a function/event body are errors.
    pub throw_binary_outside: bool,
    /// Call expressions outside a function/event body are errors.
    pub throw_call_outside: bool,
    /// Cast expressions outside a function/event body are errors.
    pub throw_cast_outside: bool,
    /// `New` outside a function/event body is an error.
    pub throw_new_outside: bool,
    /// Maximum recursion depth for nested statements/expressions, guarding against stack
    /// overflow on pathological input. Not part of the original grammar; an ambient addition.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            throw_scriptname_missing: true,
            throw_scriptname_mismatch: true,
            throw_return_outside: true,
            throw_if_outside: true,
            throw_while_outside: true,
            throw_binary_outside: true,
            throw_call_outside: true,
            throw_cast_outside: true,
            throw_new_outside: true,
            max_depth: 256,
        }
    }
}
