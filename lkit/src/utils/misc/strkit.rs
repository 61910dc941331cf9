//! # String Kit
//!
//! Small, dependency-light string helpers. The logging core only relies on
//! [`format`] and [`format_time`]; everything else is general purpose.
//!
//! "Blank" throughout this module means empty or made only of ASCII spaces.
//! Tabs and newlines are content.

use std::borrow::Cow;
use std::fmt::{self, Write as _};

use chrono::{DateTime, NaiveDateTime, TimeZone};
use rand::Rng;
use regex::Regex;
use static_init::dynamic;

/// Layout used for every rendered timestamp: `YYYY-MM-DD HH:MM:SS`.
pub const FORMAT_TIME: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder token understood by the logging API.
pub const PLACEHOLDER: &str = "{}";

const WHITE_SPACE: u8 = b' ';
const SEED: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const REG_DIGIT: &str = r"^[0-9]*$";
const REG_TIME: &str = r"^(?:[01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9]$";
const REG_DATE_TIME: &str = r"^([0-9]{1,4}-(?:1[0-2]|0?[1-9])-(?:0?[1-9]|[1-2][0-9]|30|31)) ((?:[01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9])$";
const REG_CAR_NO: &str = r"^[京津沪渝冀豫云辽黑湘皖鲁新苏浙赣鄂桂甘晋蒙陕吉闽贵粤青藏川宁琼使领][A-HJ-NP-Z](?:(?:[A-HJ-NP-Z0-9]{4}[A-HJ-NP-Z0-9挂学警港澳])|(?:(?:[0-9]{5}[A-HJK])|(?:[A-HJK][A-HJ-NP-Z0-9][0-9]{4})))$";
const REG_TELE_PHONE: &str = r"^(?:(?:[0-9]{3}-)?[0-9]{8}|(?:[0-9]{4}-)?[0-9]{7,8})(?:-[0-9]+)?$";
const REG_MOBILE_PHONE: &str = r"^(?:(?:\+|00)86)?1[3-9][0-9]{9}$";
const REG_ID_CARD: &str = r"^[1-9][0-9]{5}(?:18|19|20)[0-9]{2}(?:0[1-9]|10|11|12)(?:0[1-9]|[1-2][0-9]|30|31)[0-9]{3}[0-9Xx]$";
const REG_DOMAIN: &str = r"^[a-zA-Z0-9][-a-zA-Z0-9]{0,62}(?:\.[a-zA-Z0-9][-a-zA-Z0-9]{0,62})+$";
const REG_URL: &str = r"^(?:https?://)?[a-zA-Z0-9][-a-zA-Z0-9]{0,62}(?:\.[a-zA-Z0-9][-a-zA-Z0-9]{0,62})+$";
const REG_EMAIL: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9][-a-zA-Z0-9]{0,62}(?:\.[a-zA-Z0-9][-a-zA-Z0-9]{0,62})+$";
const REG_IPV4: &str = r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$";
const REG_MAC: &str = r"^(?:(?:[a-fA-F0-9]{2}:){5}|(?:[a-fA-F0-9]{2}-){5})[a-fA-F0-9]{2}$";
const REG_VERSION: &str = r"^[0-9]+(?:\.[0-9]+){2}$";

// Patterns are constants; compiling them once on first use.
#[dynamic(lazy)]
static RE_DIGIT: Regex = Regex::new(REG_DIGIT).expect("digit pattern");
#[dynamic(lazy)]
static RE_TIME: Regex = Regex::new(REG_TIME).expect("time pattern");
#[dynamic(lazy)]
static RE_DATE_TIME: Regex = Regex::new(REG_DATE_TIME).expect("date-time pattern");
#[dynamic(lazy)]
static RE_CAR_NO: Regex = Regex::new(REG_CAR_NO).expect("car number pattern");
#[dynamic(lazy)]
static RE_TELE_PHONE: Regex = Regex::new(REG_TELE_PHONE).expect("telephone pattern");
#[dynamic(lazy)]
static RE_MOBILE_PHONE: Regex = Regex::new(REG_MOBILE_PHONE).expect("mobile phone pattern");
#[dynamic(lazy)]
static RE_ID_CARD: Regex = Regex::new(REG_ID_CARD).expect("id card pattern");
#[dynamic(lazy)]
static RE_DOMAIN: Regex = Regex::new(REG_DOMAIN).expect("domain pattern");
#[dynamic(lazy)]
static RE_URL: Regex = Regex::new(REG_URL).expect("url pattern");
#[dynamic(lazy)]
static RE_EMAIL: Regex = Regex::new(REG_EMAIL).expect("email pattern");
#[dynamic(lazy)]
static RE_IPV4: Regex = Regex::new(REG_IPV4).expect("ipv4 pattern");
#[dynamic(lazy)]
static RE_MAC: Regex = Regex::new(REG_MAC).expect("mac pattern");
#[dynamic(lazy)]
static RE_VERSION: Regex = Regex::new(REG_VERSION).expect("version pattern");

/// # Arg
///
/// One typed argument for [`format`] and [`format_sql`].
///
/// Integers, floats, strings and timestamps get dedicated renderings; any
/// other value goes through [`Arg::display`] or [`Arg::debug`]. Most callers
/// never name this type: the `From` impls let the logging macros convert
/// arguments on the fly.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg<'a> {
    /// Any primitive integer up to 64 bits, signed or not.
    Int(i128),
    /// A double, rendered in plain (non-exponent) notation with the fewest digits
    /// that round-trip.
    Float(f64),
    /// Borrowed or owned text, copied verbatim.
    Str(Cow<'a, str>),
    /// A wall-clock timestamp, rendered with [`FORMAT_TIME`].
    Time(NaiveDateTime),
    /// Pre-rendered text for everything else.
    Other(String),
}

impl Arg<'static> {
    /// Generic fallback: renders `value` with its `Display` impl.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Arg::Other(value.to_string())
    }

    /// Generic fallback for types without `Display` (maps, vectors, ...).
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Arg::Other(format!("{:?}", value))
    }
}

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(v) => write!(f, "{}", v),
            Arg::Float(v) => write_float(f, *v),
            Arg::Str(v) => f.write_str(v),
            Arg::Time(v) => write!(f, "{}", v.format(FORMAT_TIME)),
            Arg::Other(v) => f.write_str(v),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_infinite() {
        f.write_str(if v > 0.0 { "+Inf" } else { "-Inf" })
    } else {
        // `Display` for f64 never switches to exponent notation.
        write!(f, "{}", v)
    }
}

macro_rules! int_args {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg<'_> {
                fn from(v: $t) -> Self {
                    Arg::Int(v as i128)
                }
            }
        )*
    };
}

int_args!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl From<u128> for Arg<'_> {
    fn from(v: u128) -> Self {
        Arg::Other(v.to_string())
    }
}

impl From<f64> for Arg<'_> {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<f32> for Arg<'_> {
    // Widening to f64 would print the binary expansion (0.1 -> 0.10000000149011612).
    fn from(v: f32) -> Self {
        Arg::Other(v.to_string())
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(v: &'a str) -> Self {
        Arg::Str(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(v: &'a String) -> Self {
        Arg::Str(Cow::Borrowed(v.as_str()))
    }
}

impl From<String> for Arg<'_> {
    fn from(v: String) -> Self {
        Arg::Str(Cow::Owned(v))
    }
}

impl<'a> From<Cow<'a, str>> for Arg<'a> {
    fn from(v: Cow<'a, str>) -> Self {
        Arg::Str(v)
    }
}

impl From<bool> for Arg<'_> {
    fn from(v: bool) -> Self {
        Arg::Other(v.to_string())
    }
}

impl From<char> for Arg<'_> {
    fn from(v: char) -> Self {
        Arg::Other(v.to_string())
    }
}

impl From<NaiveDateTime> for Arg<'_> {
    fn from(v: NaiveDateTime) -> Self {
        Arg::Time(v)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Arg<'_> {
    fn from(v: DateTime<Tz>) -> Self {
        Arg::Time(v.naive_local())
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for Arg<'_> {
    fn from(v: &DateTime<Tz>) -> Self {
        Arg::Time(v.naive_local())
    }
}

/// Returns `true` when `b` is an ASCII lowercase letter.
pub fn is_lower(b: u8) -> bool {
    b.is_ascii_lowercase()
}

/// Returns `true` when `b` is an ASCII uppercase letter.
pub fn is_upper(b: u8) -> bool {
    b.is_ascii_uppercase()
}

/// Byte at `index`, or `None` when out of range.
pub fn byte_at(s: &str, index: usize) -> Option<u8> {
    s.as_bytes().get(index).copied()
}

/// Zero length.
pub fn is_empty(s: &str) -> bool {
    s.is_empty()
}

/// At least one byte.
pub fn is_not_empty(s: &str) -> bool {
    !is_empty(s)
}

/// `default` if `s` is empty, otherwise `s`.
pub fn default_if_empty<'a>(s: &'a str, default: &'a str) -> &'a str {
    if is_empty(s) { default } else { s }
}

/// `true` if the list is empty or any element is empty.
pub fn is_any_empty<S: AsRef<str>>(strs: &[S]) -> bool {
    strs.is_empty() || strs.iter().any(|s| is_empty(s.as_ref()))
}

/// Non-empty list with no empty element.
pub fn is_none_empty<S: AsRef<str>>(strs: &[S]) -> bool {
    !is_any_empty(strs)
}

/// Empty, or made only of ASCII spaces.
pub fn is_blank(s: &str) -> bool {
    s.bytes().all(|b| b == WHITE_SPACE)
}

/// Holds something other than ASCII spaces.
pub fn is_not_blank(s: &str) -> bool {
    !is_blank(s)
}

/// `default` if `s` is blank, otherwise `s`.
pub fn default_if_blank<'a>(s: &'a str, default: &'a str) -> &'a str {
    if is_blank(s) { default } else { s }
}

/// `true` if the list is empty or any element is blank.
pub fn is_any_blank<S: AsRef<str>>(strs: &[S]) -> bool {
    strs.is_empty() || strs.iter().any(|s| is_blank(s.as_ref()))
}

/// Non-empty list with no blank element.
pub fn is_none_blank<S: AsRef<str>>(strs: &[S]) -> bool {
    !is_any_blank(strs)
}

/// Unanchored regex search. An invalid `pattern` never matches.
pub fn match_string(s: &str, pattern: &str) -> bool {
    Regex::new(pattern).map(|re| re.is_match(s)).unwrap_or(false)
}

/// Uppercases the first character when it is an ASCII lowercase letter.
pub fn first_char_to_upper(s: &str) -> String {
    map_first(s, |c| c.to_ascii_uppercase())
}

/// Lowercases the first character when it is an ASCII uppercase letter.
pub fn first_char_to_lower(s: &str) -> String {
    map_first(s, |c| c.to_ascii_lowercase())
}

fn map_first(s: &str, f: impl Fn(char) -> char) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(s.len());
            out.push(f(first));
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// # To Lower Camel
///
/// `"user_first_name"` becomes `"userFirstName"`. Leading and trailing
/// underscores are trimmed and blank segments are dropped.
pub fn to_lower_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, segment) in s.trim_matches('_').split('_').enumerate() {
        if is_blank(segment) {
            continue;
        }
        if i == 0 {
            out.push_str(&first_char_to_lower(segment));
        } else {
            out.push_str(&first_char_to_upper(segment));
        }
    }
    out
}

/// # To Upper Camel
///
/// `"user_first_name"` becomes `"UserFirstName"`. Blank segments are dropped.
pub fn to_upper_camel(s: &str) -> String {
    s.split('_')
        .filter(|segment| is_not_blank(segment))
        .map(first_char_to_upper)
        .collect()
}

/// A vector of `len` copies of `fill`.
pub fn fill_vec(len: usize, fill: &str) -> Vec<String> {
    vec![fill.to_string(); len]
}

/// # Format Param
///
/// Named substitution: each `(key, value)` pair replaces the first `{key}`
/// in `template`.
///
/// ```
/// use lkit::utils::misc::strkit::format_param;
///
/// let out = format_param("hello my name is {a}, age is {b}", [("a", "acorn"), ("b", "22")]);
/// assert_eq!(out, "hello my name is acorn, age is 22");
/// ```
pub fn format_param<I, K, V>(template: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = template.to_string();
    for (key, value) in params {
        out = out.replacen(&format!("{{{}}}", key.as_ref()), value.as_ref(), 1);
    }
    out
}

/// # Format
///
/// Positional substitution used for every log message.
///
/// Each argument, in order, replaces the next `placeholder` occurrence. Text
/// after the last consumed placeholder passes through untouched, so surplus
/// placeholders stay literally in the output and surplus arguments are
/// ignored. A blank `template`, a blank `placeholder` or an empty `args`
/// returns `template` unchanged.
///
/// ```
/// use lkit::utils::misc::strkit::{format, Arg};
///
/// let out = format("id {} name {}", "{}", &[Arg::from(1), Arg::from("wty")]);
/// assert_eq!(out, "id 1 name wty");
/// ```
pub fn format(template: &str, placeholder: &str, args: &[Arg<'_>]) -> String {
    if is_blank(template) || is_blank(placeholder) || args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    for arg in args {
        let Some(index) = rest.find(placeholder) else {
            break;
        };
        out.push_str(&rest[..index]);
        let _ = write!(out, "{}", arg);
        rest = &rest[index + placeholder.len()..];
    }
    out.push_str(rest);
    out
}

/// # Format SQL
///
/// Inlines `params` into `?` markers. Numbers are written bare; strings,
/// timestamps and any other value are wrapped in single quotes.
///
/// This is a debugging aid for printing statements. It does not escape
/// anything and must never build SQL that is actually executed.
pub fn format_sql(sql: &str, params: &[Arg<'_>]) -> String {
    if is_blank(sql) || params.is_empty() {
        return sql.to_string();
    }

    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;
    for param in params {
        let Some(index) = rest.find('?') else {
            break;
        };
        out.push_str(&rest[..index]);
        let _ = match param {
            Arg::Int(_) | Arg::Float(_) => write!(out, "{}", param),
            _ => write!(out, "'{}'", param),
        };
        rest = &rest[index + 1..];
    }
    out.push_str(rest);
    out
}

/// Renders `t` in its own time zone as `YYYY-MM-DD HH:MM:SS`.
pub fn format_time<Tz>(t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    t.format(FORMAT_TIME).to_string()
}

/// Meters to a short label: `"1.50km"` above 1000 m, `"12.00m"` otherwise.
pub fn format_distance(meters: f64) -> String {
    if meters > 1000.0 {
        format!("{:.2}km", meters / 1000.0)
    } else {
        format!("{:.2}m", meters)
    }
}

/// 32 random alphanumeric characters.
pub fn random_string() -> String {
    random_string_n(32)
}

/// `count` characters drawn uniformly from `[0-9a-zA-Z]`.
pub fn random_string_n(count: usize) -> String {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| SEED[rng.random_range(0..SEED.len())] as char)
        .collect()
}

/// `prefix` followed by enough random characters to reach `total_len` bytes.
/// A prefix longer than `total_len` is returned as is.
pub fn random_with_prefix(prefix: &str, total_len: usize) -> String {
    let mut out = prefix.to_string();
    out.push_str(&random_string_n(total_len.saturating_sub(prefix.len())));
    out
}

/// A 4 character captcha.
pub fn captcha() -> String {
    captcha_n(4)
}

/// An `n` character alphanumeric captcha.
pub fn captcha_n(n: usize) -> String {
    random_string_n(n)
}

/// Only ASCII digits (the empty string qualifies).
pub fn is_digit(s: &str) -> bool {
    RE_DIGIT.is_match(s)
}

/// `HH:MM:SS`, 24 hour clock.
pub fn is_time(s: &str) -> bool {
    RE_TIME.is_match(s)
}

/// `Y-M-D HH:MM:SS` with 1-4 digit years and optional zero padding on month/day.
pub fn is_date_time(s: &str) -> bool {
    RE_DATE_TIME.is_match(s)
}

/// Mainland China licence plate, including new-energy plates.
pub fn is_car_no(s: &str) -> bool {
    RE_CAR_NO.is_match(s)
}

/// Landline number with optional area code and extension.
pub fn is_tele_phone(s: &str) -> bool {
    RE_TELE_PHONE.is_match(s)
}

/// Mainland China mobile number, optionally prefixed with `+86` or `0086`.
pub fn is_mobile_phone(s: &str) -> bool {
    RE_MOBILE_PHONE.is_match(s)
}

/// 18 digit resident identity number (last character may be `X`).
pub fn is_id_card(s: &str) -> bool {
    RE_ID_CARD.is_match(s)
}

/// Dot separated labels of up to 63 characters, at least two of them.
pub fn is_domain(s: &str) -> bool {
    RE_DOMAIN.is_match(s)
}

/// A domain with an optional `http://` or `https://` scheme.
pub fn is_url(s: &str) -> bool {
    RE_URL.is_match(s)
}

/// `local@domain`, where the domain follows [`is_domain`].
pub fn is_email(s: &str) -> bool {
    RE_EMAIL.is_match(s)
}

/// Dotted quad, each octet 0-255 without leading zeros.
pub fn is_ipv4(s: &str) -> bool {
    RE_IPV4.is_match(s)
}

/// Six hex pairs separated consistently by `:` or `-`.
pub fn is_mac(s: &str) -> bool {
    RE_MAC.is_match(s)
}

/// `major.minor.patch`, digits only.
pub fn is_version_no(s: &str) -> bool {
    RE_VERSION.is_match(s)
}
