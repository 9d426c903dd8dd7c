//! Lenient JSON front end and typed field access with error context.

use serde_json::{Map, Value};

use crate::error::{EntityKind, GltfError, GltfResult};

/// Remove `//` line comments and `/* */` block comments that sit outside
/// string literals. Newlines inside comments are kept so serde_json error
/// positions still point at the right line.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parse manifest text. The root must be an object.
pub fn parse_manifest(text: &str) -> GltfResult<Map<String, Value>> {
    let value: Value = serde_json::from_str(&strip_comments(text))
        .map_err(|e| GltfError::MalformedJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(GltfError::MalformedJson(format!(
            "root must be an object, found {}",
            type_name(&other)
        ))),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One manifest object, with the entity kind and key used in errors.
#[derive(Clone, Copy)]
pub(crate) struct Fields<'a> {
    pub entity: EntityKind,
    pub key: &'a str,
    obj: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(entity: EntityKind, key: &'a str, value: &'a Value) -> GltfResult<Self> {
        match value {
            Value::Object(obj) => Ok(Self { entity, key, obj }),
            other => Err(GltfError::invalid(
                entity,
                key,
                "(self)",
                format!("expected an object, found {}", type_name(other)),
            )),
        }
    }

    /// Same entity context over a nested object.
    pub fn nested(&self, value: &'a Value, field: &'static str) -> GltfResult<Self> {
        match value {
            Value::Object(obj) => Ok(Self { obj, ..*self }),
            other => Err(self.wrong_type(field, "an object", other)),
        }
    }

    /// Raw member; `null` counts as absent.
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.obj.get(field).filter(|v| !v.is_null())
    }

    pub fn members(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.obj.iter()
    }

    fn wrong_type(&self, field: &'static str, expected: &str, found: &Value) -> GltfError {
        GltfError::invalid(
            self.entity,
            self.key,
            field,
            format!("expected {}, found {}", expected, type_name(found)),
        )
    }

    pub fn opt_object(&self, field: &'static str) -> GltfResult<Option<Fields<'a>>> {
        self.get(field).map(|v| self.nested(v, field)).transpose()
    }

    pub fn opt_str(&self, field: &'static str) -> GltfResult<Option<&'a str>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.wrong_type(field, "a string", other)),
        }
    }

    pub fn req_str(&self, field: &'static str) -> GltfResult<&'a str> {
        match self.get(field) {
            Some(Value::String(s)) => Ok(s),
            _ => Err(GltfError::missing(self.entity, self.key, field)),
        }
    }

    pub fn opt_u64(&self, field: &'static str) -> GltfResult<Option<u64>> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(field, "a non-negative integer", v)),
        }
    }

    pub fn req_u64(&self, field: &'static str) -> GltfResult<u64> {
        match self.get(field).and_then(Value::as_u64) {
            Some(n) => Ok(n),
            None => Err(GltfError::missing(self.entity, self.key, field)),
        }
    }

    pub fn opt_usize(&self, field: &'static str) -> GltfResult<Option<usize>> {
        Ok(self.opt_u64(field)?.map(|n| n as usize))
    }

    pub fn req_usize(&self, field: &'static str) -> GltfResult<usize> {
        Ok(self.req_u64(field)? as usize)
    }

    pub fn opt_u32(&self, field: &'static str) -> GltfResult<Option<u32>> {
        match self.opt_u64(field)? {
            None => Ok(None),
            Some(n) => u32::try_from(n)
                .map(Some)
                .map_err(|_| GltfError::invalid(self.entity, self.key, field, format!("{} is out of range", n))),
        }
    }

    pub fn opt_f32(&self, field: &'static str) -> GltfResult<Option<f32>> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(|f| Some(f as f32))
                .ok_or_else(|| self.wrong_type(field, "a number", v)),
        }
    }

    pub fn req_f32(&self, field: &'static str) -> GltfResult<f32> {
        match self.get(field).and_then(Value::as_f64) {
            Some(f) => Ok(f as f32),
            None => Err(GltfError::missing(self.entity, self.key, field)),
        }
    }

    pub fn opt_bool(&self, field: &'static str) -> GltfResult<Option<bool>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.wrong_type(field, "a boolean", other)),
        }
    }

    /// A numeric array of any length.
    pub fn opt_floats(&self, field: &'static str) -> GltfResult<Option<Vec<f32>>> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let Value::Array(items) = value else {
            return Err(self.wrong_type(field, "an array of numbers", value));
        };
        items
            .iter()
            .map(|item| {
                item.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| self.wrong_type(field, "an array of numbers", value))
            })
            .collect::<GltfResult<Vec<f32>>>()
            .map(Some)
    }

    /// A numeric array of exactly `N` elements.
    pub fn opt_float_array<const N: usize>(&self, field: &'static str) -> GltfResult<Option<[f32; N]>> {
        match self.opt_floats(field)? {
            None => Ok(None),
            Some(values) => <[f32; N]>::try_from(values.as_slice()).map(Some).map_err(|_| {
                GltfError::invalid(
                    self.entity,
                    self.key,
                    field,
                    format!("expected {} numbers, found {}", N, values.len()),
                )
            }),
        }
    }

    /// An array of strings; absent means empty.
    pub fn str_list(&self, field: &'static str) -> GltfResult<Vec<String>> {
        let Some(value) = self.get(field) else {
            return Ok(Vec::new());
        };
        let Value::Array(items) = value else {
            return Err(self.wrong_type(field, "an array of strings", value));
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.wrong_type(field, "an array of strings", value))
            })
            .collect()
    }

    /// An object of string values as ordered (member, value) pairs; absent
    /// means empty.
    pub fn str_pairs(&self, field: &'static str) -> GltfResult<Vec<(String, String)>> {
        let Some(value) = self.get(field) else {
            return Ok(Vec::new());
        };
        let Value::Object(members) = value else {
            return Err(self.wrong_type(field, "an object of strings", value));
        };
        members
            .iter()
            .map(|(member, item)| match item {
                Value::String(s) => Ok((member.clone(), s.clone())),
                other => Err(self.wrong_type(field, "an object of strings", other)),
            })
            .collect()
    }

    pub fn name(&self) -> GltfResult<String> {
        Ok(self.opt_str("name")?.unwrap_or_default().to_string())
    }

    pub fn extras(&self) -> Value {
        self.get("extras").cloned().unwrap_or(Value::Null)
    }
}
