//! The fixed function library available to every template.
//!
//! Helpers form a closed set enumerated by [`Helper`]. Each one exists as a
//! plain Rust function and as a Tera function registered under its template
//! name by [`FunctionLibrary::install`]. Adding a helper means adding a
//! variant; there is no runtime registration.
//!
//! # Template usage
//!
//! Tera functions take named arguments:
//!
//! ```text
//! {{ largeNumFmt(n=views) }}                      1,234,567
//! {{ pluralize(singular="post", plural="posts", n=count) }}
//! {% if isRTL(d=direction) %}dir="rtl"{% endif %}
//! {{ localstr(term="Publish", lang=lang) }}
//! {{ localhtml(term="Hosted on write.as", lang=lang) }}   not escaped
//! {{ title(s=collection.title) }}
//! {% set opts = dict(pairs=["single", true, "count", 3]) %}
//! ```

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Function, Tera};
use thiserror::Error;

use crate::constants::{BRAND_LINK, BRAND_TEXT};
use crate::l10n::{DEFAULT_LANGUAGE, Localizer, StringTables};

/// Every helper available to templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Helper {
    LargeNumFmt,
    Pluralize,
    IsRtl,
    IsLtr,
    LocalStr,
    LocalHtml,
    ToLower,
    Title,
    HasPrefix,
    HasSuffix,
    Dict,
}

impl Helper {
    pub const ALL: [Helper; 11] = [
        Helper::LargeNumFmt,
        Helper::Pluralize,
        Helper::IsRtl,
        Helper::IsLtr,
        Helper::LocalStr,
        Helper::LocalHtml,
        Helper::ToLower,
        Helper::Title,
        Helper::HasPrefix,
        Helper::HasSuffix,
        Helper::Dict,
    ];

    /// Name the helper is called by in templates.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Helper::LargeNumFmt => "largeNumFmt",
            Helper::Pluralize => "pluralize",
            Helper::IsRtl => "isRTL",
            Helper::IsLtr => "isLTR",
            Helper::LocalStr => "localstr",
            Helper::LocalHtml => "localhtml",
            Helper::ToLower => "tolower",
            Helper::Title => "title",
            Helper::HasPrefix => "hasPrefix",
            Helper::HasSuffix => "hasSuffix",
            Helper::Dict => "dict",
        }
    }
}

/// Format an integer with `,` between groups of three digits.
///
/// # Examples
///
/// ```
/// use freely_templates::templating::functions::large_num_fmt;
///
/// assert_eq!(large_num_fmt(1234567), "1,234,567");
/// assert_eq!(large_num_fmt(-1234), "-1,234");
/// ```
#[must_use]
pub fn large_num_fmt(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `singular` when `n` is exactly one, `plural` otherwise (including 0 and
/// negative counts).
#[must_use]
pub fn pluralize<'a>(singular: &'a str, plural: &'a str, n: i64) -> &'a str {
    if n == 1 { singular } else { plural }
}

/// Whether `direction` is the right-to-left code `rtl`.
#[must_use]
pub fn is_rtl(direction: &str) -> bool {
    direction == "rtl"
}

/// Whether `direction` is `ltr` or `auto`; any other value, `rtl` included,
/// is neither.
#[must_use]
pub fn is_ltr(direction: &str) -> bool {
    direction == "ltr" || direction == "auto"
}

/// Look `term` up for `lang`, falling back to the default table when the
/// language has no entry or an empty one.
#[must_use]
pub fn local_str(localizer: &dyn Localizer, term: &str, lang: &str) -> String {
    let lookup = |lang: &str| {
        localizer.strings(lang).and_then(|table| table.get(term)).filter(|s| !s.is_empty())
    };
    lookup(lang).or_else(|| lookup(DEFAULT_LANGUAGE)).cloned().unwrap_or_default()
}

/// [`local_str`] with the first brand mention turned into a link.
///
/// The result is inserted into output unescaped, so string tables must never
/// carry user-supplied content.
#[must_use]
pub fn local_html(localizer: &dyn Localizer, term: &str, lang: &str) -> String {
    local_str(localizer, term, lang).replacen(BRAND_TEXT, BRAND_LINK, 1)
}

/// Title-case the first letter of every word, leaving the rest untouched.
///
/// Words are runs of alphanumeric characters; an apostrophe between two of
/// them does not end the word, so `don't` becomes `Don't`. The first letter
/// gets its titlecase form, which differs from upper case for ligatures and
/// digraphs: `ßtraße` becomes `Sstraße` and `ﬁsh` becomes `Fish`.
#[must_use]
pub fn title(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            if in_word {
                out.push(c);
            } else {
                push_titlecase(&mut out, c);
                in_word = true;
            }
        } else {
            let joins_word = in_word
                && matches!(c, '\'' | '\u{2019}')
                && chars.get(i + 1).is_some_and(|next| next.is_alphanumeric());
            if !joins_word {
                in_word = false;
            }
            out.push(c);
        }
    }

    out
}

/// Titlecase expansions that are not "first upper, rest lower".
const TITLECASE_EXPANSIONS: &[(char, &str)] = &[
    ('\u{0149}', "\u{02BC}N"),
    ('\u{1FB2}', "\u{1FBA}\u{0345}"),
    ('\u{1FB4}', "\u{0386}\u{0345}"),
    ('\u{1FB7}', "\u{0391}\u{0342}\u{0345}"),
    ('\u{1FC2}', "\u{1FCA}\u{0345}"),
    ('\u{1FC4}', "\u{0389}\u{0345}"),
    ('\u{1FC7}', "\u{0397}\u{0342}\u{0345}"),
    ('\u{1FF2}', "\u{1FFA}\u{0345}"),
    ('\u{1FF4}', "\u{038F}\u{0345}"),
    ('\u{1FF7}', "\u{03A9}\u{0342}\u{0345}"),
];

/// Append the titlecase mapping of `c`.
///
/// Titlecase forms that differ from upper case are listed explicitly. Every
/// other expansion keeps its first character in upper case and lowers the
/// rest (`ß` -> `Ss`, `ﬂ` -> `Fl`).
fn push_titlecase(out: &mut String, c: char) {
    if let Some((_, expansion)) = TITLECASE_EXPANSIONS.iter().find(|(from, _)| *from == c) {
        out.push_str(expansion);
        return;
    }

    let titled = match c {
        '\u{01C4}'..='\u{01C6}' => Some('\u{01C5}'),
        '\u{01C7}'..='\u{01C9}' => Some('\u{01C8}'),
        '\u{01CA}'..='\u{01CC}' => Some('\u{01CB}'),
        '\u{01F1}'..='\u{01F3}' => Some('\u{01F2}'),
        '\u{1F80}'..='\u{1F87}' | '\u{1F90}'..='\u{1F97}' | '\u{1FA0}'..='\u{1FA7}' => {
            char::from_u32(u32::from(c) + 8)
        }
        '\u{1F88}'..='\u{1F8F}'
        | '\u{1F98}'..='\u{1F9F}'
        | '\u{1FA8}'..='\u{1FAF}'
        | '\u{1FBC}'
        | '\u{1FCC}'
        | '\u{1FFC}' => Some(c),
        '\u{1FB3}' => Some('\u{1FBC}'),
        '\u{1FC3}' => Some('\u{1FCC}'),
        '\u{1FF3}' => Some('\u{1FFC}'),
        _ => None,
    };
    if let Some(titled) = titled {
        out.push(titled);
        return;
    }

    let mut upper = c.to_uppercase();
    if let Some(first) = upper.next() {
        out.push(first);
    }
    for rest in upper {
        out.extend(rest.to_lowercase());
    }
}

/// Failures of the [`dict`] helper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    /// A key was left without a value.
    #[error("dict: invalid number of parameters")]
    OddLength,
    /// The entry at `position` sits in a key slot but is not a string.
    #[error("dict: keys must be strings")]
    NonStringKey { position: usize },
}

/// Build a mapping from alternating keys and values.
///
/// Keys must be strings; values may be anything.
pub fn dict(values: &[Value]) -> Result<Map<String, Value>, DictError> {
    if values.len() % 2 != 0 {
        return Err(DictError::OddLength);
    }

    let mut map = Map::with_capacity(values.len() / 2);
    for (i, pair) in values.chunks_exact(2).enumerate() {
        let Value::String(key) = &pair[0] else {
            return Err(DictError::NonStringKey { position: i * 2 });
        };
        map.insert(key.clone(), pair[1].clone());
    }
    Ok(map)
}

/// The helper set bound to one localization service, shared by every
/// compiled template.
pub struct FunctionLibrary {
    localizer: Arc<dyn Localizer>,
}

impl std::fmt::Debug for FunctionLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionLibrary")
            .field("helpers", &Helper::ALL.map(Helper::name))
            .finish_non_exhaustive()
    }
}

impl Default for FunctionLibrary {
    fn default() -> Self {
        Self::new(Arc::new(StringTables::default()))
    }
}

impl FunctionLibrary {
    /// Bind the helper set to `localizer`.
    ///
    /// # Arguments
    ///
    /// * `localizer` - string tables used by `localstr` and `localhtml`
    #[must_use]
    pub fn new(localizer: Arc<dyn Localizer>) -> Self {
        Self { localizer }
    }

    /// The localization service behind `localstr` and `localhtml`.
    #[must_use]
    pub fn localizer(&self) -> &dyn Localizer {
        self.localizer.as_ref()
    }

    /// Register every helper into `tera`.
    pub fn install(&self, tera: &mut Tera) {
        for helper in Helper::ALL {
            self.register(helper, tera);
        }
    }

    fn register(&self, helper: Helper, tera: &mut Tera) {
        let name = helper.name();
        match helper {
            Helper::LargeNumFmt => {
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    Ok(Value::String(large_num_fmt(int_arg(name, args, "n")?)))
                });
            }
            Helper::Pluralize => {
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    let singular = str_arg(name, args, "singular")?;
                    let plural = str_arg(name, args, "plural")?;
                    let n = int_arg(name, args, "n")?;
                    Ok(Value::String(pluralize(singular, plural, n).to_string()))
                });
            }
            Helper::IsRtl => {
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    Ok(Value::Bool(is_rtl(str_arg(name, args, "d")?)))
                });
            }
            Helper::IsLtr => {
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    Ok(Value::Bool(is_ltr(str_arg(name, args, "d")?)))
                });
            }
            Helper::LocalStr => {
                let localizer = Arc::clone(&self.localizer);
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    let term = str_arg(name, args, "term")?;
                    let lang = optional_str_arg(name, args, "lang")?.unwrap_or(DEFAULT_LANGUAGE);
                    Ok(Value::String(local_str(localizer.as_ref(), term, lang)))
                });
            }
            Helper::LocalHtml => {
                tera.register_function(
                    name,
                    TrustedLocalHtml {
                        localizer: Arc::clone(&self.localizer),
                    },
                );
            }
            Helper::ToLower => {
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    Ok(Value::String(str_arg(name, args, "s")?.to_lowercase()))
                });
            }
            Helper::Title => {
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    Ok(Value::String(title(str_arg(name, args, "s")?)))
                });
            }
            Helper::HasPrefix => {
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    let s = str_arg(name, args, "s")?;
                    Ok(Value::Bool(s.starts_with(str_arg(name, args, "prefix")?)))
                });
            }
            Helper::HasSuffix => {
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    let s = str_arg(name, args, "s")?;
                    Ok(Value::Bool(s.ends_with(str_arg(name, args, "suffix")?)))
                });
            }
            Helper::Dict => {
                tera.register_function(name, move |args: &HashMap<String, Value>| {
                    let pairs = args
                        .get("pairs")
                        .and_then(Value::as_array)
                        .ok_or_else(|| tera::Error::msg(format!("{name}: `pairs` must be an array")))?;
                    dict(pairs).map(Value::Object).map_err(|e| tera::Error::msg(e.to_string()))
                });
            }
        }
    }
}

/// `localhtml`: output is trusted markup and bypasses autoescaping.
struct TrustedLocalHtml {
    localizer: Arc<dyn Localizer>,
}

impl Function for TrustedLocalHtml {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let name = Helper::LocalHtml.name();
        let term = str_arg(name, args, "term")?;
        let lang = optional_str_arg(name, args, "lang")?.unwrap_or(DEFAULT_LANGUAGE);
        Ok(Value::String(local_html(self.localizer.as_ref(), term, lang)))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

fn str_arg<'a>(helper: &str, args: &'a HashMap<String, Value>, arg: &str) -> tera::Result<&'a str> {
    optional_str_arg(helper, args, arg)?
        .ok_or_else(|| tera::Error::msg(format!("{helper}: missing argument `{arg}`")))
}

fn optional_str_arg<'a>(
    helper: &str,
    args: &'a HashMap<String, Value>,
    arg: &str,
) -> tera::Result<Option<&'a str>> {
    match args.get(arg) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => {
            Err(tera::Error::msg(format!("{helper}: `{arg}` must be a string, got {other}")))
        }
    }
}

fn int_arg(helper: &str, args: &HashMap<String, Value>, arg: &str) -> tera::Result<i64> {
    match args.get(arg) {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| tera::Error::msg(format!("{helper}: `{arg}` must be an integer, got {value}"))),
        None => Err(tera::Error::msg(format!("{helper}: missing argument `{arg}`"))),
    }
}
