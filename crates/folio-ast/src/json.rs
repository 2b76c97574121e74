//! Pandoc JSON codec for tree nodes.
//!
//! Nodes are encoded as `{"t": "Kind", "c": content}`; kinds without content
//! omit `c`. Kinds this crate does not model are kept as raw JSON values, and
//! so are the layout parts of tables (column specs, alignments, spans).

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Value, json};

use crate::node::{
    Attr, Block, Caption, Cell, Inline, QuoteType, Row, Table, TableBody, TableSection, Target,
};
use crate::AstError;

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_block(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        decode_block(Value::deserialize(deserializer)?).map_err(D::Error::custom)
    }
}

impl Serialize for Inline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_inline(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Inline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        decode_inline(Value::deserialize(deserializer)?).map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn node_tag(value: &Value, kind: &'static str) -> Result<String, AstError> {
    value
        .get("t")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| AstError::malformed(kind, "missing `t` tag"))
}

fn content(value: &mut Value, kind: &'static str) -> Result<Value, AstError> {
    value
        .get_mut("c")
        .map(Value::take)
        .ok_or_else(|| AstError::malformed(kind, "missing `c` content"))
}

fn fields<const N: usize>(value: Value, kind: &'static str) -> Result<[Value; N], AstError> {
    match value {
        Value::Array(items) => <[Value; N]>::try_from(items).map_err(|items| {
            AstError::malformed(kind, format!("expected {N} fields, found {}", items.len()))
        }),
        other => Err(AstError::malformed(
            kind,
            format!("expected an array, found {other}"),
        )),
    }
}

fn array(value: Value, kind: &'static str) -> Result<Vec<Value>, AstError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(AstError::malformed(
            kind,
            format!("expected an array, found {other}"),
        )),
    }
}

fn string(value: Value, kind: &'static str) -> Result<String, AstError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(AstError::malformed(
            kind,
            format!("expected a string, found {other}"),
        )),
    }
}

fn decode_blocks(value: Value) -> Result<Vec<Block>, AstError> {
    array(value, "block list")?
        .into_iter()
        .map(decode_block)
        .collect()
}

fn decode_inlines(value: Value) -> Result<Vec<Inline>, AstError> {
    array(value, "inline list")?
        .into_iter()
        .map(decode_inline)
        .collect()
}

fn decode_items(value: Value) -> Result<Vec<Vec<Block>>, AstError> {
    array(value, "list items")?
        .into_iter()
        .map(decode_blocks)
        .collect()
}

fn decode_definitions(value: Value) -> Result<Vec<(Vec<Inline>, Vec<Vec<Block>>)>, AstError> {
    array(value, "DefinitionList")?
        .into_iter()
        .map(|item| -> Result<_, AstError> {
            let [term, definitions] = fields(item, "DefinitionList")?;
            Ok((decode_inlines(term)?, decode_items(definitions)?))
        })
        .collect()
}

fn decode_caption(value: Value) -> Result<Caption, AstError> {
    let [short, long] = fields(value, "Caption")?;
    Ok(Caption {
        short,
        long: decode_blocks(long)?,
    })
}

fn decode_table(value: Value) -> Result<Table, AstError> {
    let [attr, caption, col_specs, head, bodies, foot] = fields(value, "Table")?;
    Ok(Table {
        attr: decode_attr(attr)?,
        caption: decode_caption(caption)?,
        col_specs,
        head: decode_table_section(head, "TableHead")?,
        bodies: array(bodies, "Table")?
            .into_iter()
            .map(decode_table_body)
            .collect::<Result<_, _>>()?,
        foot: decode_table_section(foot, "TableFoot")?,
    })
}

fn decode_table_section(value: Value, kind: &'static str) -> Result<TableSection, AstError> {
    let [attr, rows] = fields(value, kind)?;
    Ok(TableSection {
        attr: decode_attr(attr)?,
        rows: decode_rows(rows)?,
    })
}

fn decode_table_body(value: Value) -> Result<TableBody, AstError> {
    let [attr, row_head_columns, head, body] = fields(value, "TableBody")?;
    Ok(TableBody {
        attr: decode_attr(attr)?,
        row_head_columns,
        head: decode_rows(head)?,
        body: decode_rows(body)?,
    })
}

fn decode_rows(value: Value) -> Result<Vec<Row>, AstError> {
    array(value, "Row")?
        .into_iter()
        .map(|row| -> Result<_, AstError> {
            let [attr, cells] = fields(row, "Row")?;
            Ok(Row {
                attr: decode_attr(attr)?,
                cells: array(cells, "Row")?
                    .into_iter()
                    .map(decode_cell)
                    .collect::<Result<_, _>>()?,
            })
        })
        .collect()
}

fn decode_cell(value: Value) -> Result<Cell, AstError> {
    let [attr, alignment, row_span, col_span, content] = fields(value, "Cell")?;
    Ok(Cell {
        attr: decode_attr(attr)?,
        alignment,
        row_span,
        col_span,
        content: decode_blocks(content)?,
    })
}

fn decode_attr(value: Value) -> Result<Attr, AstError> {
    let [id, classes, attributes] = fields(value, "Attr")?;
    let classes = array(classes, "Attr")?
        .into_iter()
        .map(|c| string(c, "Attr"))
        .collect::<Result<_, _>>()?;
    let attributes = array(attributes, "Attr")?
        .into_iter()
        .map(|pair| -> Result<_, AstError> {
            let [key, value] = fields(pair, "Attr")?;
            Ok((string(key, "Attr")?, string(value, "Attr")?))
        })
        .collect::<Result<_, _>>()?;

    Ok(Attr {
        id: string(id, "Attr")?,
        classes,
        attributes,
    })
}

fn decode_target(value: Value) -> Result<Target, AstError> {
    let [url, title] = fields(value, "Target")?;
    Ok(Target {
        url: string(url, "Target")?,
        title: string(title, "Target")?,
    })
}

fn decode_quote_type(value: &Value) -> Result<QuoteType, AstError> {
    match value.get("t").and_then(Value::as_str) {
        Some("SingleQuote") => Ok(QuoteType::SingleQuote),
        Some("DoubleQuote") => Ok(QuoteType::DoubleQuote),
        _ => Err(AstError::malformed("Quoted", format!("unknown quote type {value}"))),
    }
}

pub(crate) fn decode_block(mut value: Value) -> Result<Block, AstError> {
    let tag = node_tag(&value, "block")?;

    let block = match tag.as_str() {
        "Plain" => Block::Plain(decode_inlines(content(&mut value, "Plain")?)?),
        "Para" => Block::Para(decode_inlines(content(&mut value, "Para")?)?),
        "LineBlock" => Block::LineBlock(
            array(content(&mut value, "LineBlock")?, "LineBlock")?
                .into_iter()
                .map(decode_inlines)
                .collect::<Result<_, _>>()?,
        ),
        "Header" => {
            let [level, attr, inlines] = fields(content(&mut value, "Header")?, "Header")?;
            let level = level
                .as_u64()
                .and_then(|l| u32::try_from(l).ok())
                .ok_or_else(|| AstError::malformed("Header", format!("invalid level {level}")))?;
            Block::Header(level, decode_attr(attr)?, decode_inlines(inlines)?)
        }
        "BlockQuote" => Block::BlockQuote(decode_blocks(content(&mut value, "BlockQuote")?)?),
        "BulletList" => Block::BulletList(decode_items(content(&mut value, "BulletList")?)?),
        "OrderedList" => {
            let [list_attrs, items] = fields(content(&mut value, "OrderedList")?, "OrderedList")?;
            Block::OrderedList(list_attrs, decode_items(items)?)
        }
        "DefinitionList" => {
            Block::DefinitionList(decode_definitions(content(&mut value, "DefinitionList")?)?)
        }
        "Div" => {
            let [attr, blocks] = fields(content(&mut value, "Div")?, "Div")?;
            Block::Div(decode_attr(attr)?, decode_blocks(blocks)?)
        }
        "Figure" => {
            let [attr, caption, blocks] = fields(content(&mut value, "Figure")?, "Figure")?;
            Block::Figure(decode_attr(attr)?, decode_caption(caption)?, decode_blocks(blocks)?)
        }
        "Table" => Block::Table(Box::new(decode_table(content(&mut value, "Table")?)?)),
        "RawBlock" => {
            let [format, text] = fields(content(&mut value, "RawBlock")?, "RawBlock")?;
            Block::RawBlock(string(format, "RawBlock")?, string(text, "RawBlock")?)
        }
        _ => Block::Other(value),
    };

    Ok(block)
}

pub(crate) fn decode_inline(mut value: Value) -> Result<Inline, AstError> {
    let tag = node_tag(&value, "inline")?;

    let inline = match tag.as_str() {
        "Str" => Inline::Str(string(content(&mut value, "Str")?, "Str")?),
        "Space" => Inline::Space,
        "SoftBreak" => Inline::SoftBreak,
        "LineBreak" => Inline::LineBreak,
        "Emph" => Inline::Emph(decode_inlines(content(&mut value, "Emph")?)?),
        "Underline" => Inline::Underline(decode_inlines(content(&mut value, "Underline")?)?),
        "Strong" => Inline::Strong(decode_inlines(content(&mut value, "Strong")?)?),
        "Strikeout" => Inline::Strikeout(decode_inlines(content(&mut value, "Strikeout")?)?),
        "Superscript" => Inline::Superscript(decode_inlines(content(&mut value, "Superscript")?)?),
        "Subscript" => Inline::Subscript(decode_inlines(content(&mut value, "Subscript")?)?),
        "SmallCaps" => Inline::SmallCaps(decode_inlines(content(&mut value, "SmallCaps")?)?),
        "Quoted" => {
            let [quote, inlines] = fields(content(&mut value, "Quoted")?, "Quoted")?;
            Inline::Quoted(decode_quote_type(&quote)?, decode_inlines(inlines)?)
        }
        "Cite" => {
            let [citations, inlines] = fields(content(&mut value, "Cite")?, "Cite")?;
            Inline::Cite(citations, decode_inlines(inlines)?)
        }
        "Span" => {
            let [attr, inlines] = fields(content(&mut value, "Span")?, "Span")?;
            Inline::Span(decode_attr(attr)?, decode_inlines(inlines)?)
        }
        "Link" => {
            let [attr, inlines, target] = fields(content(&mut value, "Link")?, "Link")?;
            Inline::Link(
                decode_attr(attr)?,
                decode_inlines(inlines)?,
                decode_target(target)?,
            )
        }
        "Image" => {
            let [attr, inlines, target] = fields(content(&mut value, "Image")?, "Image")?;
            Inline::Image(
                decode_attr(attr)?,
                decode_inlines(inlines)?,
                decode_target(target)?,
            )
        }
        "Note" => Inline::Note(decode_blocks(content(&mut value, "Note")?)?),
        "RawInline" => {
            let [format, text] = fields(content(&mut value, "RawInline")?, "RawInline")?;
            Inline::RawInline(string(format, "RawInline")?, string(text, "RawInline")?)
        }
        _ => Inline::Other(value),
    };

    Ok(inline)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn encode_blocks(blocks: &[Block]) -> Result<Value, AstError> {
    blocks
        .iter()
        .map(encode_block)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn encode_inlines(inlines: &[Inline]) -> Result<Value, AstError> {
    inlines
        .iter()
        .map(encode_inline)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn encode_items(items: &[Vec<Block>]) -> Result<Value, AstError> {
    items
        .iter()
        .map(|item| encode_blocks(item))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn encode_caption(caption: &Caption) -> Result<Value, AstError> {
    Ok(json!([caption.short, encode_blocks(&caption.long)?]))
}

fn encode_table(table: &Table) -> Result<Value, AstError> {
    let bodies = table
        .bodies
        .iter()
        .map(|body| -> Result<_, AstError> {
            Ok(json!([
                encode_attr(&body.attr),
                body.row_head_columns,
                encode_rows(&body.head)?,
                encode_rows(&body.body)?,
            ]))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!([
        encode_attr(&table.attr),
        encode_caption(&table.caption)?,
        table.col_specs,
        encode_table_section(&table.head)?,
        bodies,
        encode_table_section(&table.foot)?,
    ]))
}

fn encode_table_section(section: &TableSection) -> Result<Value, AstError> {
    Ok(json!([encode_attr(&section.attr), encode_rows(&section.rows)?]))
}

fn encode_rows(rows: &[Row]) -> Result<Value, AstError> {
    rows.iter()
        .map(|row| -> Result<_, AstError> {
            let cells = row
                .cells
                .iter()
                .map(|cell| -> Result<_, AstError> {
                    Ok(json!([
                        encode_attr(&cell.attr),
                        cell.alignment,
                        cell.row_span,
                        cell.col_span,
                        encode_blocks(&cell.content)?,
                    ]))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(json!([encode_attr(&row.attr), cells]))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn encode_attr(attr: &Attr) -> Value {
    let attributes: Vec<Value> = attr
        .attributes
        .iter()
        .map(|(k, v)| json!([k, v]))
        .collect();
    json!([attr.id, attr.classes, attributes])
}

fn encode_target(target: &Target) -> Value {
    json!([target.url, target.title])
}

fn node(tag: &str, content: Value) -> Value {
    json!({ "t": tag, "c": content })
}

fn leaf(tag: &str) -> Value {
    json!({ "t": tag })
}

pub(crate) fn encode_block(block: &Block) -> Result<Value, AstError> {
    let value = match block {
        Block::Plain(inlines) => node("Plain", encode_inlines(inlines)?),
        Block::Para(inlines) => node("Para", encode_inlines(inlines)?),
        Block::LineBlock(lines) => node(
            "LineBlock",
            Value::Array(
                lines
                    .iter()
                    .map(|line| encode_inlines(line))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        ),
        Block::Header(level, attr, inlines) => node(
            "Header",
            json!([level, encode_attr(attr), encode_inlines(inlines)?]),
        ),
        Block::BlockQuote(blocks) => node("BlockQuote", encode_blocks(blocks)?),
        Block::BulletList(items) => node("BulletList", encode_items(items)?),
        Block::OrderedList(list_attrs, items) => {
            node("OrderedList", json!([list_attrs, encode_items(items)?]))
        }
        Block::DefinitionList(items) => {
            let items = items
                .iter()
                .map(|(term, definitions)| -> Result<_, AstError> {
                    Ok(json!([encode_inlines(term)?, encode_items(definitions)?]))
                })
                .collect::<Result<Vec<_>, _>>()?;
            node("DefinitionList", Value::Array(items))
        }
        Block::Div(attr, blocks) => node("Div", json!([encode_attr(attr), encode_blocks(blocks)?])),
        Block::Figure(attr, caption, blocks) => node(
            "Figure",
            json!([encode_attr(attr), encode_caption(caption)?, encode_blocks(blocks)?]),
        ),
        Block::Table(table) => node("Table", encode_table(table)?),
        Block::RawBlock(format, text) => node("RawBlock", json!([format, text])),
        Block::Other(value) => value.clone(),
    };

    Ok(value)
}

pub(crate) fn encode_inline(inline: &Inline) -> Result<Value, AstError> {
    let value = match inline {
        Inline::Str(text) => node("Str", json!(text)),
        Inline::Space => leaf("Space"),
        Inline::SoftBreak => leaf("SoftBreak"),
        Inline::LineBreak => leaf("LineBreak"),
        Inline::Emph(inlines) => node("Emph", encode_inlines(inlines)?),
        Inline::Underline(inlines) => node("Underline", encode_inlines(inlines)?),
        Inline::Strong(inlines) => node("Strong", encode_inlines(inlines)?),
        Inline::Strikeout(inlines) => node("Strikeout", encode_inlines(inlines)?),
        Inline::Superscript(inlines) => node("Superscript", encode_inlines(inlines)?),
        Inline::Subscript(inlines) => node("Subscript", encode_inlines(inlines)?),
        Inline::SmallCaps(inlines) => node("SmallCaps", encode_inlines(inlines)?),
        Inline::Quoted(quote, inlines) => {
            let quote = match quote {
                QuoteType::SingleQuote => leaf("SingleQuote"),
                QuoteType::DoubleQuote => leaf("DoubleQuote"),
            };
            node("Quoted", json!([quote, encode_inlines(inlines)?]))
        }
        Inline::Cite(citations, inlines) => {
            node("Cite", json!([citations, encode_inlines(inlines)?]))
        }
        Inline::Span(attr, inlines) => {
            node("Span", json!([encode_attr(attr), encode_inlines(inlines)?]))
        }
        Inline::Link(attr, inlines, target) => node(
            "Link",
            json!([encode_attr(attr), encode_inlines(inlines)?, encode_target(target)]),
        ),
        Inline::Image(attr, inlines, target) => node(
            "Image",
            json!([encode_attr(attr), encode_inlines(inlines)?, encode_target(target)]),
        ),
        Inline::Note(blocks) => node("Note", encode_blocks(blocks)?),
        Inline::RawInline(format, text) => node("RawInline", json!([format, text])),
        Inline::Marker(_) => return Err(AstError::UnsplicedMarker),
        Inline::Other(value) => value.clone(),
    };

    Ok(value)
}
