//! The pluggable code generator capability.

use crate::context::GeneratorContext;
use crate::descriptor::FileDescriptor;
use crate::error::CodeGenError;

/// One pluggable generator: consumes a schema file, a parameter string, and
/// the run's context, and produces success or failure.
///
/// A driver runs a fixed, ordered sequence of `generate` calls against one
/// context per run. A failure aborts only that call; the run continues and
/// the driver decides how to report it. The `FaultExit`/`FaultAbort` error
/// variants are the only signals a driver may translate into process
/// termination; the library itself never terminates the process.
pub trait CodeGenerator {
    /// Generates output for `file` into `context`.
    ///
    /// # Errors
    ///
    /// Returns a `CodeGenError` describing why this invocation failed;
    /// context-protocol violations must be propagated as the invocation's
    /// own failure.
    fn generate(
        &self,
        file: &FileDescriptor,
        parameter: &str,
        context: &mut GeneratorContext,
    ) -> Result<(), CodeGenError>;
}
