//! XML to JSON conversion

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::{Map, Value};

/// Element being built while its children are read
struct OpenElement {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

/// Convert an XML document into a JSON tree
///
/// The root element becomes the single key of the returned object. Attributes
/// are stored as `@name`, text as a plain string (or `#text` when the element
/// also has attributes or children), and repeated child names collapse into an
/// array. Empty elements become `null`.
pub fn xml_to_json(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root = Map::new();
    let mut stack: Vec<OpenElement> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let (name, fields) = open_element(&e)?;
                stack.push(OpenElement {
                    name,
                    fields,
                    text: String::new(),
                });
            }
            Ok(Event::Empty(e)) => {
                let (name, fields) = open_element(&e)?;
                let parent = match stack.last_mut() {
                    Some(open) => &mut open.fields,
                    None => &mut root,
                };
                insert_child(parent, name, close_element(fields, String::new()));
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::xml(format!("Invalid text content: {e}")))?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| Error::xml("Closing tag without an open element"))?;
                let value = close_element(open.fields, open.text);
                let parent = match stack.last_mut() {
                    Some(parent) => &mut parent.fields,
                    None => &mut root,
                };
                insert_child(parent, open.name, value);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::xml(format!(
                    "Malformed XML at position {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::xml(format!("Unclosed element <{}>", open.name)));
    }
    if root.is_empty() {
        return Err(Error::xml("Document has no root element"));
    }
    Ok(Value::Object(root))
}

fn open_element(e: &BytesStart<'_>) -> Result<(String, Map<String, Value>)> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut fields = Map::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::xml(format!("Invalid attribute on <{name}>: {e}")))?;
        let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
        let value = attr
            .unescape_value()
            .map_err(|e| Error::xml(format!("Invalid attribute value on <{name}>: {e}")))?;
        fields.insert(key, Value::String(value.into_owned()));
    }
    Ok((name, fields))
}

fn close_element(mut fields: Map<String, Value>, text: String) -> Value {
    if fields.is_empty() {
        return if text.is_empty() {
            Value::Null
        } else {
            Value::String(text)
        };
    }
    if !text.is_empty() {
        fields.insert("#text".to_string(), Value::String(text));
    }
    Value::Object(fields)
}

fn insert_child(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(name, value);
        }
    }
}
