use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use boa_engine::{
    Context, JsError, JsNativeError, JsNativeErrorKind, JsObject, JsResult, JsValue, Script,
    Source,
};
use serde::{Deserialize, Serialize};

use super::console::{self, display_string, OutputBuffer};
use super::outcome::{ExecutionOutcome, Failure, FailureKind};

/// `e.message` for Error-like throws, `String(e)` for anything else.
///
/// `Error` and `String` are bound before the program runs so that
/// reassigning those globals cannot change how its failure is reported.
const DESCRIBE_THROWN: &str = r#"
(function () {
  var ErrorCtor = Error, toStr = String;
  return function (e) {
    return e instanceof ErrorCtor ? toStr(e.message) : toStr(e);
  };
})()
"#;

/// The program is the body of this function. The body starts on the first
/// line so that parser positions match the source.
const PROGRAM_PREFIX: &str = "(function (console) {";
const PROGRAM_SUFFIX: &str = "\n})";

/// Same body as a declaration. A body that closes the function early cannot
/// parse under both wrappers.
const CHECK_PREFIX: &str = "function program(console) {";
const CHECK_SUFFIX: &str = "\n}";

/// Stack of the evaluation thread. Deep recursion through native calls
/// (getters, callbacks) nests the engine's run loop.
const WORKER_STACK_BYTES: usize = 256 * 1024 * 1024;

/// VM value-stack slots granted per allowed call.
const STACK_SLOTS_PER_CALL: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLimits {
    /// Abort evaluation after this many loop iterations. `None` lets a
    /// non-terminating program hang the caller.
    pub loop_iteration_limit: Option<u64>,

    /// Maximum call depth. `None` keeps the engine's default.
    pub recursion_limit: Option<usize>,

    /// Sources longer than this are not evaluated at all.
    pub max_source_bytes: usize,
}

impl ExecutionLimits {
    pub const DEFAULT_MAX_SOURCE_BYTES: usize = 512 * 1024;
    pub const DEFAULT_RECURSION_LIMIT: usize = 10_000;
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            loop_iteration_limit: None,
            recursion_limit: Some(Self::DEFAULT_RECURSION_LIMIT),
            max_source_bytes: Self::DEFAULT_MAX_SOURCE_BYTES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sandbox {
    limits: ExecutionLimits,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limits(mut self, limits: ExecutionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn loop_iteration_limit(mut self, limit: u64) -> Self {
        self.limits.loop_iteration_limit = Some(limit);
        self
    }

    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.limits.recursion_limit = Some(limit);
        self
    }

    pub fn get_limits(&self) -> &ExecutionLimits {
        &self.limits
    }

    /// Evaluate `source` once in a fresh context on its own thread.
    ///
    /// Never fails: every error the program can raise, and any panic of the
    /// engine, ends up in [`ExecutionOutcome::failure`].
    pub fn execute(&self, source: &str) -> ExecutionOutcome {
        if source.len() > self.limits.max_source_bytes {
            log::warn!(
                "Refused to evaluate source of {} bytes (limit: {} bytes)",
                source.len(),
                self.limits.max_source_bytes
            );
            return ExecutionOutcome::aborted(format!(
                "Source exceeds {} byte limit",
                self.limits.max_source_bytes
            ));
        }

        let limits = self.limits;
        let worker = thread::Builder::new()
            .name("jsgrade-sandbox".to_owned())
            .stack_size(WORKER_STACK_BYTES);
        let joined = thread::scope(|scope| {
            worker
                .spawn_scoped(scope, || Self::execute_here(&limits, source))
                .map(|handle| handle.join())
        });

        match joined {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(payload)) => {
                ExecutionOutcome::aborted(format!("Engine panicked: {}", panic_message(&*payload)))
            }
            Err(e) => {
                log::error!("Failed to spawn sandbox thread: {}", e);
                ExecutionOutcome::aborted(format!("Cannot start evaluation: {}", e))
            }
        }
    }

    fn execute_here(limits: &ExecutionLimits, source: &str) -> ExecutionOutcome {
        let buffer = OutputBuffer::new();
        let failure = guarded(|| {
            let mut context = Self::new_context(limits);
            Self::evaluate(source, &buffer, &mut context)
        });

        let lines = buffer.lines();
        log::debug!(
            "Evaluated {} bytes: {} line(s) captured, failure={:?}",
            source.len(),
            lines.len(),
            failure
        );
        match failure {
            None => ExecutionOutcome::completed(&lines),
            Some(failure) => ExecutionOutcome::failed(&lines, failure),
        }
    }

    fn new_context(limits: &ExecutionLimits) -> Context {
        let mut context = Context::default();
        let runtime_limits = context.runtime_limits_mut();
        if let Some(n) = limits.loop_iteration_limit {
            runtime_limits.set_loop_iteration_limit(n);
        }
        if let Some(n) = limits.recursion_limit {
            runtime_limits.set_recursion_limit(n);
            let slots = n.saturating_mul(STACK_SLOTS_PER_CALL);
            if slots > runtime_limits.stack_size_limit() {
                runtime_limits.set_stack_size_limit(slots);
            }
        }
        context
    }

    /// `Ok(None)` when the program ran to completion, `Ok(Some(_))` when it
    /// failed to parse or threw, `Err(_)` when reporting the failure itself failed.
    fn evaluate(
        source: &str,
        buffer: &OutputBuffer,
        context: &mut Context,
    ) -> JsResult<Option<Failure>> {
        let describe = Self::compile_callable(DESCRIBE_THROWN, context)?;

        let check = format!("{}{}{}", CHECK_PREFIX, source, CHECK_SUFFIX);
        if let Err(e) = Script::parse(Source::from_bytes(&check), None, context) {
            return Self::failure(FailureKind::Syntax, &e, &describe, context).map(Some);
        }

        let wrapped = format!("{}{}{}", PROGRAM_PREFIX, source, PROGRAM_SUFFIX);
        let program = match Self::compile_callable(&wrapped, context) {
            Ok(program) => program,
            Err(e) => return Self::failure(FailureKind::Syntax, &e, &describe, context).map(Some),
        };

        let console = console::build_console(buffer, context);
        match program.call(&JsValue::undefined(), &[JsValue::from(console)], context) {
            Ok(_) => Ok(None),
            Err(e) => Self::failure(FailureKind::Runtime, &e, &describe, context).map(Some),
        }
    }

    /// Engine-raised errors carry their message directly; thrown values go
    /// through `describe`. Runtime limits cannot be caught and always abort.
    fn failure(
        kind: FailureKind,
        error: &JsError,
        describe: &JsObject,
        context: &mut Context,
    ) -> JsResult<Failure> {
        if let Some(native) = error.as_native() {
            let kind = match native.kind {
                JsNativeErrorKind::RuntimeLimit => FailureKind::Aborted,
                _ => kind,
            };
            return Ok(Failure::new(kind, native.message()));
        }

        let thrown = error.to_opaque(context);
        let message = describe.call(&JsValue::undefined(), &[thrown], context)?;
        Ok(Failure::new(kind, display_string(&message, context)?))
    }

    fn compile_callable(code: &str, context: &mut Context) -> JsResult<JsObject> {
        let value = context.eval(Source::from_bytes(code))?;
        value.as_callable().cloned().ok_or_else(|| {
            JsNativeError::typ()
                .with_message("code did not evaluate to a function")
                .into()
        })
    }
}

/// Run `f`, turning an engine error or panic into an aborted failure.
fn guarded<F>(f: F) -> Option<Failure>
where
    F: FnOnce() -> JsResult<Option<Failure>>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(failure)) => failure,
        Ok(Err(e)) => {
            log::warn!("Evaluation aborted by engine: {}", e);
            Some(Failure::new(FailureKind::Aborted, e.to_string()))
        }
        Err(payload) => {
            let message = panic_message(&*payload);
            log::error!("Engine panicked: {}", message);
            Some(Failure::new(
                FailureKind::Aborted,
                format!("Engine panicked: {}", message),
            ))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
