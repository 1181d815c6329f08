use std::collections::HashMap;
use std::fmt;

use glam::Vec3;
use log::{debug, warn};

use crate::ast::{PropertyValue, Reference, T3dObject, Value};

/// Parse failure with the 1-based position of the offending text.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "syntax error at {}:{}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for SyntaxError {}

type Result<T> = std::result::Result<T, SyntaxError>;

/// Character cursor over a single line of map text. The format is
/// line-oriented: no value ever continues onto the next line.
#[derive(Clone)]
struct Cursor<'a> {
    line: &'a str,
    line_no: usize,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str, line_no: usize) -> Self {
        Self {
            line,
            line_no,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.line[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line: self.line_no,
            column: self.pos + 1,
            message: message.into(),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        &self.line[start..self.pos]
    }

    /// Identifiers double as bare values, so dots and dashes are allowed
    /// after the first character (`Engine.S_Actor`, `CSG_Add`).
    fn ident(&mut self) -> Result<String> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Err(self.error("expected an identifier")),
        }
        let word = self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
        Ok(word.to_string())
    }

    /// True if the cursor sits on `(int)=`, the array-index form of a
    /// property assignment.
    fn peek_index_assignment(&self) -> bool {
        let mut probe = self.clone();
        if !probe.eat('(') {
            return false;
        }
        probe.skip_ws();
        if probe.take_while(|c| c.is_ascii_digit()).is_empty() {
            return false;
        }
        probe.skip_ws();
        if !probe.eat(')') {
            return false;
        }
        probe.skip_ws();
        probe.peek() == Some('=')
    }

    /// True if the (already-entered) parenthesized group opens with a
    /// `Key=` field, which makes it a struct rather than an array.
    fn peek_struct_field(&self) -> bool {
        let mut probe = self.clone();
        probe.skip_ws();
        if probe.ident().is_err() {
            return false;
        }
        probe.skip_ws();
        if probe.peek() == Some('(') {
            return probe.peek_index_assignment();
        }
        probe.peek() == Some('=')
    }
}

fn parse_index(cur: &mut Cursor) -> Result<i32> {
    cur.expect('(')?;
    cur.skip_ws();
    let digits = cur.take_while(|c| c.is_ascii_digit());
    let index = digits
        .parse::<i32>()
        .map_err(|_| cur.error("bad array index"))?;
    cur.skip_ws();
    cur.expect(')')?;
    Ok(index)
}

fn number(cur: &mut Cursor) -> Result<Value> {
    let start_col = cur.pos + 1;
    let token = cur.take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    let bad = |message: String| SyntaxError {
        line: cur.line_no,
        column: start_col,
        message,
    };

    if token.contains(&['.', 'e', 'E'][..]) {
        token
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| bad(format!("bad number '{}'", token)))
    } else if let Ok(int) = token.parse::<i32>() {
        Ok(Value::Int(int))
    } else {
        // out of integer range, the editor writes flag words like that
        token
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| bad(format!("bad number '{}'", token)))
    }
}

fn float(cur: &mut Cursor) -> Result<f32> {
    let start_col = cur.pos + 1;
    let token = cur.take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    token.parse::<f32>().map_err(|_| SyntaxError {
        line: cur.line_no,
        column: start_col,
        message: format!("bad vector component '{}'", token),
    })
}

fn string(cur: &mut Cursor) -> Result<Value> {
    cur.bump();
    let text = cur.take_while(|c| c != '"');
    if !cur.eat('"') {
        return Err(cur.error("unterminated string"));
    }
    Ok(Value::String(text.to_string()))
}

fn reference(cur: &mut Cursor, class: String) -> Result<Value> {
    cur.bump();
    let path = cur.take_while(|c| c != '\'');
    if !cur.eat('\'') {
        return Err(cur.error("unterminated reference"));
    }
    Ok(Value::Reference(Reference {
        class,
        path: path.to_string(),
    }))
}

fn struct_or_array(cur: &mut Cursor) -> Result<Value> {
    cur.bump();
    cur.skip_ws();
    if cur.eat(')') {
        return Ok(Value::Struct(HashMap::new()));
    }

    if cur.peek_struct_field() {
        let mut fields = HashMap::new();
        loop {
            cur.skip_ws();
            let name = cur.ident()?;
            cur.skip_ws();
            if cur.peek() == Some('(') && cur.peek_index_assignment() {
                // indexed fields inside a group keep only their last value
                parse_index(cur)?;
                cur.skip_ws();
            }
            cur.expect('=')?;
            let value = value_or_empty(cur)?;
            fields.insert(name, value);
            cur.skip_ws();
            if cur.eat(',') {
                continue;
            }
            cur.expect(')')?;
            break;
        }
        Ok(Value::Struct(fields))
    } else {
        let mut values = vec![];
        loop {
            cur.skip_ws();
            values.push(value_or_empty(cur)?);
            cur.skip_ws();
            if cur.eat(',') {
                continue;
            }
            cur.expect(')')?;
            break;
        }
        Ok(Value::Array(values))
    }
}

fn value(cur: &mut Cursor) -> Result<Value> {
    match cur.peek() {
        Some('"') => string(cur),
        Some('(') => struct_or_array(cur),
        Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => number(cur),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            let word = cur.ident()?;
            if cur.peek() == Some('\'') {
                reference(cur, word)
            } else if word.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if word.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Ok(Value::Identifier(word))
            }
        }
        _ => Err(cur.error("expected a value")),
    }
}

/// A value that may be missing entirely. The editor writes empty strings as
/// `Foo=` rather than `Foo=""`, so a missing value reads as one.
fn value_or_empty(cur: &mut Cursor) -> Result<Value> {
    match cur.peek() {
        None | Some(',') | Some(')') => Ok(Value::String(String::new())),
        Some(c) if c.is_whitespace() => Ok(Value::String(String::new())),
        _ => value(cur),
    }
}

fn insert_property(object: &mut T3dObject, name: String, index: Option<i32>, value: Value) {
    match object.properties.get_mut(&name) {
        Some(PropertyValue::Array(entries)) => entries.push((index, value)),
        Some(PropertyValue::Value(_)) => {
            // the editor never re-assigns a scalar, tolerate it in hand-edited files
            warn!("ignoring duplicate assignment to scalar property {}", name);
        }
        None => {
            let slot = if index.is_some() {
                PropertyValue::Array(vec![(index, value)])
            } else {
                PropertyValue::Value(value)
            };
            object.properties.insert(name, slot);
        }
    }
}

/// One statement, with its leading name already consumed: a property
/// assignment (`Name=...`, `Name(3)=...`), a vector line (`Vertex f,f,f`),
/// or a bare name, which reads as an empty-string property (`Pan U=0 V=0`).
fn statement(cur: &mut Cursor, name: String, object: &mut T3dObject) -> Result<()> {
    cur.skip_ws();
    match cur.peek() {
        Some('=') => {
            cur.bump();
            let value = value_or_empty(cur)?;
            insert_property(object, name, None, value);
        }
        Some('(') if cur.peek_index_assignment() => {
            let index = parse_index(cur)?;
            cur.skip_ws();
            cur.expect('=')?;
            let value = value_or_empty(cur)?;
            insert_property(object, name, Some(index), value);
        }
        Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => {
            let x = float(cur)?;
            cur.skip_ws();
            cur.expect(',')?;
            cur.skip_ws();
            let y = float(cur)?;
            cur.skip_ws();
            cur.expect(',')?;
            cur.skip_ws();
            let z = float(cur)?;
            object.vector_properties.push((name, Vec3::new(x, y, z)));
        }
        _ => {
            insert_property(object, name, None, Value::String(String::new()));
        }
    }
    Ok(())
}

/// Parse a whole map text into its top-level objects.
pub fn parse_t3d(text: &str) -> Result<Vec<T3dObject>> {
    let mut roots: Vec<T3dObject> = vec![];
    let mut stack: Vec<T3dObject> = vec![];
    let mut line_count = 0;

    for (idx, line) in text.lines().enumerate() {
        line_count = idx + 1;
        let mut cur = Cursor::new(line, idx + 1);

        loop {
            cur.skip_ws();
            if cur.at_end() {
                break;
            }

            let word_col = cur.pos + 1;
            let word = cur.ident()?;

            if word.eq_ignore_ascii_case("begin") {
                cur.skip_ws();
                let class = cur
                    .ident()
                    .map_err(|_| cur.error("expected a class name after Begin"))?;
                debug!("line {}: Begin {}", cur.line_no, class);
                stack.push(T3dObject::new(class));
                // the rest of the line holds the block's inline attributes
            } else if word.eq_ignore_ascii_case("end") {
                cur.skip_ws();
                let end_class = if cur.at_end() {
                    None
                } else {
                    Some(cur.ident()?)
                };

                let Some(finished) = stack.pop() else {
                    return Err(SyntaxError {
                        line: cur.line_no,
                        column: word_col,
                        message: "End with no open block".to_string(),
                    });
                };
                if let Some(end_class) = &end_class {
                    if !end_class.eq_ignore_ascii_case(&finished.class) {
                        warn!(
                            "line {}: End {} closes Begin {}",
                            cur.line_no, end_class, finished.class
                        );
                    }
                }

                match stack.last_mut() {
                    Some(parent) => parent.children.push(finished),
                    None => roots.push(finished),
                }
            } else {
                let Some(object) = stack.last_mut() else {
                    return Err(SyntaxError {
                        line: cur.line_no,
                        column: word_col,
                        message: format!("'{}' outside of a block", word),
                    });
                };
                statement(&mut cur, word, object)?;
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(SyntaxError {
            line: line_count,
            column: 1,
            message: format!("Begin {} is never closed", open.class),
        });
    }

    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::get_enum_value;

    #[test]
    fn test_empty_input() {
        assert_eq!(Vec::<T3dObject>::new(), parse_t3d("").unwrap());
        assert_eq!(Vec::<T3dObject>::new(), parse_t3d("\n   \n\t\n").unwrap());
    }

    #[test]
    fn test_simple_object() {
        let objects = parse_t3d("Begin Object\n    Answer=42\nEnd Object\n").unwrap();
        assert_eq!(1, objects.len());
        assert_eq!("Object", objects[0].class);
        assert_eq!(Some(&Value::Int(42)), objects[0].scalar("Answer"));
    }

    #[test]
    fn test_begin_line_attributes() {
        let objects = parse_t3d("Begin Actor Class=Light Name=Light3\nEnd Actor\n").unwrap();
        let actor = &objects[0];
        assert_eq!("Actor", actor.class);
        assert_eq!(Some("Light"), actor.text_property("Class"));
        assert_eq!(Some("Light3"), actor.text_property("Name"));
    }

    #[test]
    fn test_reference_array() {
        let objects = parse_t3d(
            "Begin Object\n\
                 SomeArray=(StaticMesh'Foo.Bar',StaticMesh'Baz.Boo')\n\
             End Object\n",
        )
        .unwrap();

        let values = get_enum_value!(objects[0].scalar("SomeArray").unwrap(), Value::Array);
        assert_eq!(2, values.len());

        let first = get_enum_value!(&values[0], Value::Reference);
        assert_eq!("StaticMesh", first.class);
        assert_eq!("Foo.Bar", first.path);
        let second = get_enum_value!(&values[1], Value::Reference);
        assert_eq!("Baz.Boo", second.path);
    }

    #[test]
    fn test_empty_values() {
        let objects = parse_t3d(
            "Begin Object\n\
                 MyEmptyString=\n\
                 TheNextString=\"\"\n\
             End Object\n",
        )
        .unwrap();

        let object = &objects[0];
        assert_eq!(2, object.properties.len());
        assert_eq!(
            Some(&Value::String(String::new())),
            object.scalar("MyEmptyString")
        );
        assert_eq!(
            Some(&Value::String(String::new())),
            object.scalar("TheNextString")
        );
    }

    #[test]
    fn test_value_types() {
        let objects = parse_t3d(
            "Begin Object\n\
                 Int=-7\n\
                 Plus=+5\n\
                 Float=0.500000\n\
                 Exp=1.5e-3\n\
                 Yes=True\n\
                 No=false\n\
                 Word=CSG_Add\n\
                 Text=\"two words\"\n\
                 Tex=Texture'MyLevel.Group.Wall'\n\
             End Object\n",
        )
        .unwrap();
        let object = &objects[0];

        assert_eq!(Some(&Value::Int(-7)), object.scalar("Int"));
        assert_eq!(Some(&Value::Int(5)), object.scalar("Plus"));
        assert_eq!(Some(&Value::Float(0.5)), object.scalar("Float"));
        assert_eq!(Some(&Value::Float(1.5e-3)), object.scalar("Exp"));
        assert_eq!(Some(&Value::Bool(true)), object.scalar("Yes"));
        assert_eq!(Some(&Value::Bool(false)), object.scalar("No"));
        assert_eq!(
            Some(&Value::Identifier("CSG_Add".to_string())),
            object.scalar("Word")
        );
        assert_eq!(
            Some(&Value::String("two words".to_string())),
            object.scalar("Text")
        );
        let reference = get_enum_value!(object.scalar("Tex").unwrap(), Value::Reference);
        assert_eq!("MyLevel.Group.Wall", reference.path);
    }

    #[test]
    fn test_nested_struct() {
        let objects = parse_t3d(
            "Begin Object\n\
                 MainScale=(Scale=(X=2.000000,Y=1.000000,Z=1.000000),SheerAxis=SHEER_ZX)\n\
             End Object\n",
        )
        .unwrap();

        let scale = get_enum_value!(objects[0].scalar("MainScale").unwrap(), Value::Struct);
        assert_eq!(
            Some(&Value::Identifier("SHEER_ZX".to_string())),
            scale.get("SheerAxis")
        );
        let inner = get_enum_value!(scale.get("Scale").unwrap(), Value::Struct);
        assert_eq!(Some(&Value::Float(2.0)), inner.get("X"));
    }

    #[test]
    fn test_indexed_properties() {
        let objects = parse_t3d(
            "Begin Object\n\
                 Layers(0)=(Texture=Texture'Grass',AlphaMap=Texture'Alpha0')\n\
                 Layers(2)=(Texture=Texture'Rock')\n\
             End Object\n",
        )
        .unwrap();

        let entries = get_enum_value!(objects[0].property("Layers").unwrap(), PropertyValue::Array);
        assert_eq!(2, entries.len());
        assert_eq!(Some(0), entries[0].0);
        assert_eq!(Some(2), entries[1].0);
    }

    #[test]
    fn test_duplicate_scalar_ignored() {
        let objects = parse_t3d("Begin Object\nA=1\nA=2\nEnd Object\n").unwrap();
        assert_eq!(Some(&Value::Int(1)), objects[0].scalar("A"));
    }

    #[test]
    fn test_vector_properties() {
        let objects = parse_t3d(
            "Begin Polygon Item=Sheet Flags=264 Link=0\n\
                 Origin   +00128.000000,+00128.000000,+00000.000000\n\
                 Normal   +00000.000000,+00000.000000,-00001.000000\n\
                 Vertex   +00128.000000,+00128.000000,+00000.000000\n\
                 Vertex   -00128.000000,+00128.000000,+00000.000000\n\
             End Polygon\n",
        )
        .unwrap();
        let polygon = &objects[0];

        assert_eq!(4, polygon.vector_properties.len());
        assert_eq!("Origin", polygon.vector_properties[0].0);
        assert_eq!(
            glam::vec3(0.0, 0.0, -1.0),
            polygon.vector_properties[1].1
        );
        assert_eq!("Vertex", polygon.vector_properties[3].0);
        assert_eq!(
            glam::vec3(-128.0, 128.0, 0.0),
            polygon.vector_properties[3].1
        );
        assert_eq!(Some(&Value::Int(264)), polygon.scalar("Flags"));
    }

    #[test]
    fn test_bare_name_statement() {
        let objects = parse_t3d("Begin Polygon\n    Pan      U=0 V=0\nEnd Polygon\n").unwrap();
        let polygon = &objects[0];

        assert_eq!(
            Some(&Value::String(String::new())),
            polygon.scalar("Pan")
        );
        assert_eq!(Some(&Value::Int(0)), polygon.scalar("U"));
        assert_eq!(Some(&Value::Int(0)), polygon.scalar("V"));
    }

    #[test]
    fn test_nested_objects() {
        let objects = parse_t3d(
            "Begin Map\n\
                 Begin Actor Class=Brush Name=Brush0\n\
                     Begin Brush Name=Brush0\n\
                         Begin PolyList\n\
                         End PolyList\n\
                     End Brush\n\
                 End Actor\n\
             End Map\n",
        )
        .unwrap();

        assert_eq!(1, objects.len());
        let map = &objects[0];
        assert_eq!("Map", map.class);
        let actor = map.first_child_of_class("Actor").unwrap();
        let brush = actor.first_child_of_class("Brush").unwrap();
        assert!(brush.first_child_of_class("PolyList").is_some());
    }

    #[test]
    fn test_keyword_case() {
        let objects = parse_t3d("BEGIN Object\nend object\n").unwrap();
        assert_eq!("Object", objects[0].class);
    }

    #[test]
    fn test_end_class_mismatch_accepted() {
        // the editor always matches Begin/End words; a mismatch still closes
        // the innermost block
        let objects = parse_t3d("Begin Brush\nEnd Actor\n").unwrap();
        assert_eq!("Brush", objects[0].class);
    }

    #[test]
    fn test_end_without_begin() {
        let err = parse_t3d("End Actor\n").unwrap_err();
        assert_eq!(1, err.line);
        assert!(err.message.contains("End"));
    }

    #[test]
    fn test_statement_outside_block() {
        let err = parse_t3d("Begin Object\nEnd Object\nFoo=1\n").unwrap_err();
        assert_eq!(3, err.line);
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_t3d("Begin Object\nA=\"oops\nEnd Object\n").unwrap_err();
        assert_eq!(2, err.line);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_unterminated_reference() {
        let err = parse_t3d("Begin Object\nA=Texture'oops\nEnd Object\n").unwrap_err();
        assert_eq!(2, err.line);
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_t3d("Begin Map\nBegin Actor\nEnd Actor\n").unwrap_err();
        assert!(err.message.contains("Map"));
    }

    #[test]
    fn test_unbalanced_parens() {
        let err = parse_t3d("Begin Object\nA=(X=1,Y=2\nEnd Object\n").unwrap_err();
        assert_eq!(2, err.line);
    }
}
