use std::fmt;

use crate::error::PathError;
use crate::value::{Mapping, Value};

/// Structural address into a `Value` tree, parsed from a `/`-delimited
/// string. The empty string is the root.
///
/// Segments are kept as strings and resolved against the container actually
/// found at each position: a mapping resolves a segment as a key, a sequence
/// as a numeric index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl From<&str> for Path {
    fn from(raw: &str) -> Self {
        Path::parse(raw)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Read the sub-value addressed by `path`. The empty path is identity.
///
/// Mapping lookup tries the string key first, then an integer key when the
/// segment parses as one (YAML mappings may be keyed by integers).
pub fn extract<'a>(root: &'a Value, path: &Path) -> Result<&'a Value, PathError> {
    let mut cursor = root;
    for (position, segment) in path.iter().enumerate() {
        cursor = match cursor {
            Value::Mapping(map) => lookup(map, segment).ok_or_else(|| PathError::NotFound {
                segment: segment.to_string(),
                position,
            })?,
            Value::Sequence(items) => {
                let index = parse_index(segment, position, cursor.type_name())?;
                items.get(index).ok_or_else(|| PathError::NotFound {
                    segment: segment.to_string(),
                    position,
                })?
            }
            other => {
                return Err(PathError::TypeMismatch {
                    segment: segment.to_string(),
                    position,
                    found: other.type_name(),
                })
            }
        };
    }
    Ok(cursor)
}

/// Replace the node addressed by `path` with `replacement`, creating missing
/// intermediate containers on demand. The empty path replaces the root.
///
/// A missing intermediate becomes a sequence when the following segment is a
/// valid index, otherwise a mapping. Sequence writes beyond the current
/// length pad with `Null`; a `Null` found at an intermediate position is
/// promoted to the needed container. Any other scalar in the way is a
/// `TypeMismatch`.
pub fn place(root: &mut Value, path: &Path, replacement: Value) -> Result<(), PathError> {
    if path.is_empty() {
        *root = replacement;
        return Ok(());
    }
    let segments: Vec<&str> = path.iter().collect();
    place_at(root, &segments, 0, replacement)
}

fn place_at(
    node: &mut Value,
    segments: &[&str],
    position: usize,
    replacement: Value,
) -> Result<(), PathError> {
    let segment = segments[position];
    let last = position + 1 == segments.len();

    match node {
        Value::Mapping(map) => {
            if last {
                map.insert(Value::String(segment.to_string()), replacement);
                return Ok(());
            }
            let slot = map.get_or_insert_with(Value::String(segment.to_string()), || {
                empty_container(segments[position + 1])
            });
            if slot.is_null() {
                *slot = empty_container(segments[position + 1]);
            }
            place_at(slot, segments, position + 1, replacement)
        }
        Value::Sequence(items) => {
            let index = parse_index(segment, position, "sequence")?;
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            let slot = &mut items[index];
            if last {
                *slot = replacement;
                return Ok(());
            }
            if slot.is_null() {
                *slot = empty_container(segments[position + 1]);
            }
            place_at(slot, segments, position + 1, replacement)
        }
        other => Err(PathError::TypeMismatch {
            segment: segment.to_string(),
            position,
            found: other.type_name(),
        }),
    }
}

fn lookup<'a>(map: &'a Mapping, segment: &str) -> Option<&'a Value> {
    map.get_str(segment).or_else(|| {
        segment
            .parse::<i64>()
            .ok()
            .and_then(|key| map.get(&Value::Int(key)))
    })
}

fn parse_index(segment: &str, position: usize, found: &'static str) -> Result<usize, PathError> {
    segment.parse::<usize>().map_err(|_| PathError::TypeMismatch {
        segment: segment.to_string(),
        position,
        found,
    })
}

fn empty_container(next_segment: &str) -> Value {
    if next_segment.parse::<usize>().is_ok() {
        Value::Sequence(Vec::new())
    } else {
        Value::Mapping(Mapping::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::Mapping(Mapping::from_iter([
            (Value::from("a"), Value::from("b")),
            (
                Value::from("c"),
                Value::Sequence(vec![Value::from("d"), Value::Int(2)]),
            ),
        ]))
    }

    #[test]
    fn empty_path_is_identity() {
        let root = sample();
        assert_eq!(extract(&root, &Path::parse("")).unwrap(), &root);
    }

    #[test]
    fn extracts_nested_sequence_element() {
        let root = sample();
        assert_eq!(
            extract(&root, &Path::parse("c/0")).unwrap(),
            &Value::from("d")
        );
    }

    #[test]
    fn extract_reports_missing_key() {
        let root = sample();
        assert_eq!(
            extract(&root, &Path::parse("missing")),
            Err(PathError::NotFound {
                segment: "missing".to_string(),
                position: 0,
            })
        );
    }

    #[test]
    fn extract_reports_scalar_in_the_way() {
        let root = sample();
        assert_eq!(
            extract(&root, &Path::parse("a/x")),
            Err(PathError::TypeMismatch {
                segment: "x".to_string(),
                position: 1,
                found: "string",
            })
        );
    }

    #[test]
    fn extract_falls_back_to_integer_keys() {
        let root = Value::Mapping(Mapping::from_iter([(Value::Int(7), Value::from("v"))]));
        assert_eq!(extract(&root, &Path::parse("7")).unwrap(), &Value::from("v"));
    }

    #[test]
    fn place_on_empty_path_replaces_root() {
        let mut root = sample();
        place(&mut root, &Path::parse(""), Value::Int(1)).unwrap();
        assert_eq!(root, Value::Int(1));
    }

    #[test]
    fn place_creates_intermediate_mappings() {
        let mut root = Value::Mapping(Mapping::new());
        place(&mut root, &Path::parse("a/b"), Value::from("x")).unwrap();
        let expected = Value::Mapping(Mapping::from_iter([(
            Value::from("a"),
            Value::Mapping(Mapping::from_iter([(Value::from("b"), Value::from("x"))])),
        )]));
        assert_eq!(root, expected);
    }

    #[test]
    fn place_creates_sequence_for_numeric_segment() {
        let mut root = Value::Mapping(Mapping::new());
        place(&mut root, &Path::parse("rows/2"), Value::Int(9)).unwrap();
        let expected = Value::Mapping(Mapping::from_iter([(
            Value::from("rows"),
            Value::Sequence(vec![Value::Null, Value::Null, Value::Int(9)]),
        )]));
        assert_eq!(root, expected);
    }

    #[test]
    fn place_descends_through_null_padding() {
        let mut root = Value::Mapping(Mapping::new());
        place(&mut root, &Path::parse("rows/1/name"), Value::from("x")).unwrap();
        let rows = extract(&root, &Path::parse("rows")).unwrap();
        assert_eq!(rows.as_sequence().map(<[Value]>::len), Some(2));
        assert_eq!(
            extract(&root, &Path::parse("rows/1/name")).unwrap(),
            &Value::from("x")
        );
        assert!(extract(&root, &Path::parse("rows/0")).unwrap().is_null());
    }

    #[test]
    fn place_rejects_scalar_intermediate() {
        let mut root = sample();
        assert_eq!(
            place(&mut root, &Path::parse("a/deeper"), Value::Null),
            Err(PathError::TypeMismatch {
                segment: "deeper".to_string(),
                position: 1,
                found: "string",
            })
        );
    }

    #[test]
    fn place_overwrites_existing_entries() {
        let mut root = sample();
        place(&mut root, &Path::parse("c/1"), Value::from("e")).unwrap();
        assert_eq!(
            extract(&root, &Path::parse("c/1")).unwrap(),
            &Value::from("e")
        );
    }
}
