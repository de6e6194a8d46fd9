/// One recorded row of an infix-to-postfix conversion: the state of the
/// operator stack and output queue after a single token was consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionStep {
    pub step: usize,
    /// The not-yet-consumed tokens, space-joined.
    pub input: String,
    pub operator_stack: String,
    pub output_queue: String,
}

/// One recorded row of a postfix evaluation: the state of the operand stack
/// after a single token was consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationStep {
    pub step: usize,
    pub input: String,
    pub operand_stack: String,
}

/// One binary (or function) reduction performed by the direct evaluator,
/// in left-to-right evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionStep {
    pub step: usize,
    /// E.g. `"3 * 4"`.
    pub operation: String,
    pub result: String,
}
