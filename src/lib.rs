use anyhow::{Context, anyhow, bail};
use wasm_bindgen::prelude::*;

mod bit_set;
mod error;
pub mod ops;
mod raw_value;
mod text;

pub use bit_set::{Bitset, MAX_CAPACITY, TestMode};
pub use error::{BitsetError, ErrorKind};
pub use ops::{and, not, or, xor};
pub use raw_value::RawValue;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// JavaScript view of a [`Bitset`].
#[wasm_bindgen(js_name = Bitset)]
pub struct JsBitset(Bitset);

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn initializer_values(value: JsValue) -> anyhow::Result<Vec<RawValue>> {
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| anyhow!("{e}"))
        .context("Failed to deserialize initializer")
}

fn raw_value(value: JsValue) -> anyhow::Result<RawValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| anyhow!("Unsupported value: {e}"))
}

fn sentinel(value: JsValue, default: RawValue) -> anyhow::Result<RawValue> {
    if value.is_undefined() {
        return Ok(default);
    }
    if value.is_null() {
        bail!("Sentinel values must not be null");
    }
    raw_value(value)
}

fn test_mode(name: &str) -> anyhow::Result<TestMode> {
    match name {
        "all" => Ok(TestMode::All),
        "any" => Ok(TestMode::Any),
        "none" => Ok(TestMode::None),
        _ => bail!("Unknown test mode {name}, expected all, any or none"),
    }
}

/// Converts a JavaScript number to a size. Anything that is not a safe
/// integer maps to 0 so it clamps like any other invalid size.
#[allow(clippy::cast_possible_truncation)]
fn js_size(size: f64) -> i64 {
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    if size.fract() != 0.0 || !(-LIMIT..=LIMIT).contains(&size) {
        return 0;
    }
    size as i64
}

fn build_bitset(
    size: f64,
    initializer: JsValue,
    true_value: JsValue,
    false_value: JsValue,
) -> anyhow::Result<Bitset> {
    let size = js_size(size);
    let empty = Bitset::new(size);
    if empty.is_empty() {
        return Ok(empty);
    }
    let initializer = initializer_values(initializer)?;
    let true_value = sentinel(true_value, RawValue::Int(1)).context("Invalid true value")?;
    let false_value = sentinel(false_value, RawValue::Int(0)).context("Invalid false value")?;
    Ok(Bitset::with_initializer(
        size,
        initializer,
        true_value,
        false_value,
    )?)
}

#[wasm_bindgen(js_class = Bitset)]
#[allow(clippy::missing_errors_doc, clippy::needless_pass_by_value)]
impl JsBitset {
    #[wasm_bindgen(constructor)]
    pub fn new(
        size: f64,
        initializer: JsValue,
        true_value: JsValue,
        false_value: JsValue,
    ) -> Result<JsBitset, JsValue> {
        build_bitset(size, initializer, true_value, false_value)
            .map(JsBitset)
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))
    }

    #[wasm_bindgen(js_name = fromString)]
    pub fn from_string(text: &str) -> Result<JsBitset, JsValue> {
        Bitset::from_string(text).map(JsBitset).map_err(js_error)
    }

    pub fn get(&self, offset: usize) -> Result<bool, JsValue> {
        self.0.get(offset).map_err(js_error)
    }

    pub fn set(&mut self, offset: usize, value: JsValue) -> Result<(), JsValue> {
        let value = raw_value(value).map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
        self.0.set(offset, value).map_err(js_error)
    }

    pub fn unset(&mut self, offset: usize) -> Option<bool> {
        self.0.unset(offset)
    }

    #[must_use]
    pub fn exists(&self, offset: usize) -> bool {
        self.0.exists(offset)
    }

    #[must_use]
    pub fn all(&self) -> bool {
        self.0.all()
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.0.any()
    }

    #[must_use]
    pub fn none(&self) -> bool {
        self.0.none()
    }

    pub fn test(&self, offset: usize, mode: Option<String>) -> Result<bool, JsValue> {
        let mode = mode
            .as_deref()
            .map(test_mode)
            .transpose()
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
        self.0.test(offset, mode).map_err(js_error)
    }

    #[must_use]
    #[wasm_bindgen(js_name = toInt)]
    pub fn to_int(&self) -> u64 {
        self.0.to_int()
    }

    #[must_use]
    #[wasm_bindgen(js_name = toString)]
    pub fn to_text(&self) -> String {
        self.0.to_string()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.0.count()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.0.size()
    }
}

#[wasm_bindgen(js_name = bitsetAnd)]
#[allow(clippy::missing_errors_doc)]
pub fn bitset_and(x: &JsBitset, y: &JsBitset) -> Result<JsBitset, JsValue> {
    ops::and(&x.0, &y.0).map(JsBitset).map_err(js_error)
}

#[wasm_bindgen(js_name = bitsetOr)]
#[allow(clippy::missing_errors_doc)]
pub fn bitset_or(x: &JsBitset, y: &JsBitset) -> Result<JsBitset, JsValue> {
    ops::or(&x.0, &y.0).map(JsBitset).map_err(js_error)
}

#[wasm_bindgen(js_name = bitsetXor)]
#[allow(clippy::missing_errors_doc)]
pub fn bitset_xor(x: &JsBitset, y: &JsBitset) -> Result<JsBitset, JsValue> {
    ops::xor(&x.0, &y.0).map(JsBitset).map_err(js_error)
}

#[wasm_bindgen(js_name = bitsetNot)]
#[must_use]
pub fn bitset_not(x: &JsBitset) -> JsBitset {
    JsBitset(ops::not(&x.0))
}
