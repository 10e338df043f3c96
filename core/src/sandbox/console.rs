//! The `console` capability handed to evaluated programs.
//!
//! It is the only object the program receives from the host: three verbs that
//! append one line each to an [`OutputBuffer`] owned by the Rust side.

use boa_engine::{
    object::ObjectInitializer, Context, JsObject, JsResult, JsString, JsValue, NativeFunction,
};
use boa_gc::{Gc, GcRefCell};
use strum::IntoEnumIterator as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Verb {
    Log,
    Error,
    Warn,
}

impl Verb {
    pub fn prefix(self) -> &'static str {
        use Verb::*;
        match self {
            Log => "",
            Error => "Error: ",
            Warn => "Warning: ",
        }
    }

    /// Join already-stringified arguments into the line this verb emits.
    pub fn format_line<S: AsRef<str>>(self, args: &[S]) -> String {
        let mut line = String::from(self.prefix());
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line += arg.as_ref();
        }
        line
    }
}

type Lines = Gc<GcRefCell<Vec<String>>>;

/// Lines written through the console, in call order.
#[derive(Debug, Clone)]
pub struct OutputBuffer(Lines);

impl OutputBuffer {
    pub fn new() -> Self {
        Self(Gc::new(GcRefCell::new(Vec::new())))
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// `String(value)` as JavaScript would compute it.
///
/// `ToString` throws on symbols, `String()` does not, hence the special case.
pub fn display_string(value: &JsValue, context: &mut Context) -> JsResult<String> {
    match value {
        JsValue::Symbol(symbol) => Ok(symbol.descriptive_string().to_std_string_lossy()),
        v => Ok(v.to_string(context)?.to_std_string_lossy()),
    }
}

fn write_line(verb: Verb, args: &[JsValue], lines: &Lines, context: &mut Context) -> JsResult<JsValue> {
    let args = args
        .iter()
        .map(|arg| display_string(arg, context))
        .collect::<JsResult<Vec<_>>>()?;
    lines.borrow_mut().push(verb.format_line(&args));
    Ok(JsValue::undefined())
}

fn native_verb(verb: Verb, buffer: &OutputBuffer) -> NativeFunction {
    let lines = buffer.0.clone();
    // Each arm is a distinct non-capturing closure so that it stays `Copy`.
    match verb {
        Verb::Log => NativeFunction::from_copy_closure_with_captures(
            |_this, args, lines, ctx| write_line(Verb::Log, args, lines, ctx),
            lines,
        ),
        Verb::Error => NativeFunction::from_copy_closure_with_captures(
            |_this, args, lines, ctx| write_line(Verb::Error, args, lines, ctx),
            lines,
        ),
        Verb::Warn => NativeFunction::from_copy_closure_with_captures(
            |_this, args, lines, ctx| write_line(Verb::Warn, args, lines, ctx),
            lines,
        ),
    }
}

/// Build a plain object exposing exactly the [`Verb`]s, all writing into `buffer`.
pub fn build_console(buffer: &OutputBuffer, context: &mut Context) -> JsObject {
    let mut console = ObjectInitializer::new(context);
    for verb in Verb::iter() {
        console.function(native_verb(verb, buffer), JsString::from(verb.to_string().as_str()), 0);
    }
    console.build()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn format_line_joins_with_single_spaces() {
        assert_eq!(Verb::Log.format_line(&["Count:", "42", "items"]), "Count: 42 items");
        assert_eq!(Verb::Log.format_line::<&str>(&[]), "");
        assert_eq!(Verb::Log.format_line(&["", ""]), " ");
    }

    #[test]
    fn format_line_prefixes() {
        assert_eq!(Verb::Error.format_line(&["bad"]), "Error: bad");
        assert_eq!(Verb::Warn.format_line(&["Be", "careful"]), "Warning: Be careful");
        assert_eq!(Verb::Error.format_line::<&str>(&[]), "Error: ");
    }

    #[test]
    fn display_string_follows_js_coercion() {
        let mut ctx = Context::default();
        let s = |v: JsValue, ctx: &mut Context| display_string(&v, ctx).unwrap();

        assert_eq!(s(JsValue::undefined(), &mut ctx), "undefined");
        assert_eq!(s(JsValue::null(), &mut ctx), "null");
        assert_eq!(s(JsValue::from(true), &mut ctx), "true");
        assert_eq!(s(JsValue::from(42), &mut ctx), "42");
        assert_eq!(s(JsValue::from(1.5), &mut ctx), "1.5");
        assert_eq!(s(JsValue::from(JsString::from("hi")), &mut ctx), "hi");
    }

    #[test]
    fn lone_surrogate_becomes_replacement_char() {
        let mut ctx = Context::default();
        let units = [0xD800_u16, u16::from(b'x')];
        let v = JsValue::from(JsString::from(&units[..]));
        assert_eq!(display_string(&v, &mut ctx).unwrap(), "\u{FFFD}x");
    }

    #[test]
    fn verbs_are_named_after_console_methods() {
        let names: Vec<_> = Verb::iter().map(|v| v.to_string()).collect();
        assert_eq!(names, ["log", "error", "warn"]);
    }
}
