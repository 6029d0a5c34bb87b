//! TypeScript highlighting.
//!
//! Strings are shared with JavaScript. Decorators and primitive type names
//! get their own styles.

use crate::error::RuleError;
use crate::node::Style;
use crate::rule::RuleSet;

use super::javascript::PATTERN_JS_STRING;
use super::{generic_code_rules, groups_rule, token_rule, word_pattern, PATTERN_C_COMMENTS};

const DEFINITIONS: &[&str] = &["class", "interface", "enum", "type"];
const BUILTINS: &[&str] = &[
    "String", "Boolean", "RegExp", "Number", "Date", "Math", "JSON", "Symbol", "BigInt",
    "Atomics", "DataView", "Function", "Promise", "Generator", "GeneratorFunction",
    "AsyncFunction", "AsyncGenerator", "AsyncGeneratorFunction", "Array", "Object", "Map", "Set",
    "WeakMap", "WeakSet", "Int8Array", "Int16Array", "Int32Array", "Uint8Array", "Uint16Array",
    "Uint32Array", "Uint8ClampedArray", "Float32Array", "Float64Array", "BigInt64Array",
    "BigUint64Array", "Buffer", "ArrayBuffer", "SharedArrayBuffer", "Reflect", "Proxy", "Intl",
    "WebAssembly", "console", "process", "require", "isNaN", "parseInt", "parseFloat",
    "encodeURI", "decodeURI", "encodeURIComponent", "decodeURIComponent", "this", "global",
    "globalThis", "eval", "isFinite", "module", "setTimeout", "setInterval", "clearTimeout",
    "clearInterval", "setImmediate", "clearImmediate", "queueMicrotask", "document", "window",
    "Error", "SyntaxError", "TypeError", "RangeError", "ReferenceError", "EvalError",
    "InternalError", "URIError", "AggregateError", "escape", "unescape", "URL",
    "URLSearchParams", "TextEncoder", "TextDecoder", "AbortController", "AbortSignal",
    "EventTarget", "Event", "MessageChannel", "MessagePort", "MessageEvent",
    "FinalizationRegistry", "WeakRef", "regeneratorRuntime", "performance", "Iterable",
    "Iterator", "IterableIterator", "Partial", "Required", "Readonly", "Record", "Pick", "Omit",
    "Exclude", "Extract", "NonNullable", "Parameters", "ConstructorParameters", "ReturnType",
    "InstanceType", "ThisParameterType", "OmitThisParameter", "ThisType", "Uppercase",
    "Lowercase", "Capitalize", "Uncapitalize",
];
const KEYWORDS: &[&str] = &[
    "import", "from", "export", "default", "package", "class", "enum", "function", "super",
    "extends", "implements", "arguments", "var", "let", "const", "static", "get", "set", "new",
    "return", "break", "continue", "yield", "void", "if", "else", "for", "while", "do", "switch",
    "async", "await", "case", "try", "catch", "finally", "delete", "throw", "NaN", "Infinity",
    "of", "in", "instanceof", "typeof", "debugger", "with", "true", "false", "null",
    "undefined", "type", "as", "interface", "public", "private", "protected", "module",
    "declare", "namespace", "abstract", "keyof", "readonly", "is", "asserts", "infer",
    "override", "intrinsic",
];
const TYPES: &[&str] = &[
    "string", "number", "boolean", "object", "symbol", "any", "unknown", "bigint", "never",
];

/// `{ readonly name?:`; also matches parameters after `(` and `,`.
pub const PATTERN_TS_PROPERTY: &str = concat!(
    r"[{\[(,;](?:\s*-)?",
    r"(\s*(?:public|private|protected|readonly))?",
    r"(\s*[a-zA-Z0-9_$]+)(?:\s*\?)?\s*:"
);
pub const PATTERN_TS_REGEX: &str = r"/(?:[^/\\\n]|\\.)+/[dgimsuy]*";
pub const PATTERN_TS_FIELD: &str = r"(var|let|const)(\s+[a-zA-Z_$][a-zA-Z0-9_$]*)";
pub const PATTERN_TS_FUNCTION: &str =
    r"((?:function\*?|static|get|set|async)\s)(\s*[a-zA-Z_$][a-zA-Z0-9_$]*)?(\s*<.*?>)?";
pub const PATTERN_TS_DECORATOR: &str = r"(@)(\s*[a-zA-Z_$][a-zA-Z0-9_$]*)(<[^\n]*?>)?";

/// TypeScript highlighting.
pub fn typescript_rules<S: 'static>() -> Result<RuleSet<S>, RuleError> {
    let mut rules = RuleSet::new();
    rules
        .add_rule(token_rule("comment", PATTERN_C_COMMENTS, vec![Style::Comment])?)
        .add_rule(
            token_rule("string", PATTERN_JS_STRING, vec![Style::Literal])?.followed_by(r"\W|$")?,
        )
        .add_rule(groups_rule(
            "property",
            PATTERN_TS_PROPERTY,
            vec![Style::Keyword, Style::Identifier],
        )?)
        .add_rule(token_rule("regex", PATTERN_TS_REGEX, vec![Style::Literal])?)
        .add_rule(groups_rule(
            "field",
            PATTERN_TS_FIELD,
            vec![Style::Keyword, Style::Identifier],
        )?)
        .add_rule(groups_rule(
            "function",
            PATTERN_TS_FUNCTION,
            vec![Style::Keyword, Style::Identifier, Style::Generic],
        )?)
        .add_rule(groups_rule(
            "decorator",
            PATTERN_TS_DECORATOR,
            vec![Style::Keyword, Style::Generic, Style::Generic],
        )?)
        .add_rule(token_rule("type", &word_pattern(TYPES), vec![Style::Type])?);
    generic_code_rules(rules, DEFINITIONS, BUILTINS, KEYWORDS)
}
