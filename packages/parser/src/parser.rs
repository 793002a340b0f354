use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::Token;
use logos::Logos;

/// Where a run of script code stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeEnd {
    /// End of input
    Eof,
    /// Unmatched `}` (left unconsumed)
    Brace,
}

/// Parser for script modules containing markup.
///
/// Script code is lexed just far enough to keep brackets balanced and to find
/// markup in expression position; markup is parsed into a [`SyntaxTree`] arena
/// with byte spans so the tree can be printed back losslessly.
pub struct Parser<'src> {
    source: &'src str,
    pos: usize,
    tree: SyntaxTree,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            tree: SyntaxTree::new(source.to_string()),
        }
    }

    /// Parse a complete module
    pub fn parse_module(mut self) -> ParseResult<SyntaxTree> {
        let roots = self.scan_code(CodeEnd::Eof)?;
        for root in roots {
            self.tree.push_root(root);
        }
        Ok(self.tree)
    }

    /// Scan script code, collecting any markup found in expression position
    fn scan_code(&mut self, end: CodeEnd) -> ParseResult<Vec<NodeId>> {
        let mut roots = Vec::new();
        let mut open: Vec<(char, usize)> = Vec::new();
        let mut expr_start = true;

        loop {
            let base = self.pos;
            let source: &'src str = self.source;
            let mut lexer = Token::lexer(&source[base..]);

            let Some(result) = lexer.next() else {
                if let Some((delim, at)) = open.last() {
                    return Err(ParseError::unbalanced(*at, format!("unclosed `{}`", delim)));
                }
                if end == CodeEnd::Brace {
                    return Err(ParseError::unexpected_eof(self.source.len(), "`}`"));
                }
                self.pos = self.source.len();
                return Ok(roots);
            };

            let span = lexer.span();
            let start = base + span.start;
            let stop = base + span.end;
            let token = result.map_err(|_| ParseError::lexer_error(start))?;
            self.pos = stop;

            match &token {
                Token::UnterminatedComment => {
                    return Err(ParseError::unexpected_eof(self.source.len(), "`*/`"));
                }
                Token::LBrace => open.push(('{', start)),
                Token::LParen => open.push(('(', start)),
                Token::LBracket => open.push(('[', start)),
                Token::RBrace | Token::RParen | Token::RBracket => {
                    let close = match token {
                        Token::RBrace => '}',
                        Token::RParen => ')',
                        _ => ']',
                    };
                    if open.is_empty() && close == '}' && end == CodeEnd::Brace {
                        self.pos = start;
                        return Ok(roots);
                    }
                    match open.pop() {
                        Some((delim, _)) if closing_for(delim) == close => {}
                        Some((delim, at)) => {
                            return Err(ParseError::unbalanced(
                                start,
                                format!(
                                    "expected `{}` to close `{}` opened at {}",
                                    closing_for(delim),
                                    delim,
                                    at
                                ),
                            ));
                        }
                        None => {
                            return Err(ParseError::unbalanced(
                                start,
                                format!("unexpected `{}`", close),
                            ));
                        }
                    }
                }
                Token::LAngle if expr_start && self.markup_follows(stop) => {
                    self.pos = start;
                    roots.push(self.parse_element()?);
                    expr_start = false;
                    continue;
                }
                Token::Backtick => self.scan_template()?,
                _ => {}
            }

            expr_start = token.begins_expression();
        }
    }

    /// Skip a template literal body; `self.pos` is just past the opening backtick
    fn scan_template(&mut self) -> ParseResult<()> {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return Ok(());
                }
                b'$' if bytes.get(self.pos + 1) == Some(&b'{') => {
                    self.pos += 2;
                    self.scan_code(CodeEnd::Brace)?;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        Err(ParseError::unexpected_eof(self.source.len(), "closing backtick"))
    }

    fn markup_follows(&self, pos: usize) -> bool {
        match self.source.as_bytes().get(pos) {
            Some(c) => c.is_ascii_alphabetic() || matches!(c, b'_' | b'$' | b'>'),
            None => false,
        }
    }

    /// Parse an element starting at `<`
    fn parse_element(&mut self) -> ParseResult<NodeId> {
        let start = self.pos;
        let id = self.tree.alloc(Node::Element(Element::new("")));
        self.expect_byte(b'<', "`<`")?;

        let tag = self.read_name();
        if tag.is_empty() && self.peek() != Some(b'>') {
            return Err(self.unexpected("tag name"));
        }

        let mut attributes = Vec::new();
        let padding;
        let self_closing;

        loop {
            let ws_start = self.pos;
            self.skip_whitespace();
            let leading = self.source[ws_start..self.pos].to_string();

            match self.peek() {
                None => return Err(ParseError::unexpected_eof(self.pos, "`>`")),
                Some(b'>') => {
                    self.pos += 1;
                    padding = leading;
                    self_closing = false;
                    break;
                }
                Some(b'/') if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    padding = leading;
                    self_closing = true;
                    break;
                }
                Some(b'{') => attributes.push(self.parse_spread(leading)?),
                Some(c) if is_name_start(c) => attributes.push(self.parse_attribute(leading)?),
                Some(_) => return Err(self.unexpected("attribute or `>`")),
            }
        }

        let open_tag = Span::new(start, self.pos);
        let mut children = Vec::new();
        let mut close_tag = None;

        if !self_closing {
            loop {
                match self.peek() {
                    None => {
                        return Err(ParseError::unexpected_eof(
                            self.pos,
                            format!("`</{}>`", tag),
                        ));
                    }
                    Some(b'<') if self.peek_at(1) == Some(b'/') => {
                        let close_start = self.pos;
                        self.pos += 2;
                        self.skip_whitespace();
                        let name = self.read_name();
                        self.skip_whitespace();
                        self.expect_byte(b'>', "`>`")?;
                        if name != tag {
                            return Err(ParseError::mismatched_closing_tag(close_start, tag, name));
                        }
                        close_tag = Some(Span::new(close_start, self.pos));
                        break;
                    }
                    Some(b'<') => {
                        let child = self.parse_element()?;
                        self.tree.set_parent(child, id);
                        children.push(child);
                    }
                    Some(b'{') => {
                        let child = self.parse_expression_container()?;
                        self.tree.set_parent(child, id);
                        children.push(child);
                    }
                    Some(_) => {
                        let text_start = self.pos;
                        while let Some(c) = self.peek() {
                            if c == b'<' || c == b'{' {
                                break;
                            }
                            self.pos += 1;
                        }
                        let child = self.tree.alloc(Node::Text(Text {
                            content: self.source[text_start..self.pos].to_string(),
                            parent: Some(id),
                            span: Some(Span::new(text_start, self.pos)),
                        }));
                        children.push(child);
                    }
                }
            }
        }

        self.tree.replace_node(
            id,
            Node::Element(Element {
                tag,
                attributes,
                children,
                self_closing,
                parent: None,
                span: Some(Span::new(start, self.pos)),
                open_tag: Some(open_tag),
                open_tag_padding: padding,
                close_tag,
            }),
        );
        Ok(id)
    }

    fn parse_attribute(&mut self, leading: String) -> ParseResult<Attribute> {
        let start = self.pos;
        let name = self.read_name();
        let after_name = self.pos;

        self.skip_whitespace();
        let value = if self.peek() == Some(b'=') {
            self.pos += 1;
            self.skip_whitespace();
            match self.peek() {
                Some(quote @ (b'"' | b'\'')) => {
                    self.pos += 1;
                    let value_start = self.pos;
                    let len = self.source[value_start..]
                        .find(quote as char)
                        .ok_or_else(|| {
                            ParseError::unexpected_eof(self.source.len(), "closing quote")
                        })?;
                    self.pos = value_start + len + 1;
                    AttrValue::Quoted {
                        value: self.source[value_start..value_start + len].to_string(),
                        quote: quote as char,
                    }
                }
                Some(b'{') => {
                    self.pos += 1;
                    let inner = self.pos;
                    self.scan_code(CodeEnd::Brace)?;
                    let source = self.source[inner..self.pos].to_string();
                    self.pos += 1;
                    AttrValue::Expression { source }
                }
                _ => return Err(self.unexpected("attribute value")),
            }
        } else {
            self.pos = after_name;
            AttrValue::Presence
        };

        Ok(Attribute {
            name,
            value,
            leading,
            span: Some(Span::new(start, self.pos)),
        })
    }

    /// `{...expr}` in attribute position
    fn parse_spread(&mut self, leading: String) -> ParseResult<Attribute> {
        let start = self.pos;
        self.pos += 1;
        self.skip_whitespace();
        if !self.source[self.pos..].starts_with("...") {
            return Err(self.unexpected("`...`"));
        }
        self.pos += 3;
        let inner = self.pos;
        self.scan_code(CodeEnd::Brace)?;
        let source = self.source[inner..self.pos].to_string();
        self.pos += 1;

        Ok(Attribute {
            name: String::new(),
            value: AttrValue::Spread { source },
            leading,
            span: Some(Span::new(start, self.pos)),
        })
    }

    /// `{…}` child of an element
    fn parse_expression_container(&mut self) -> ParseResult<NodeId> {
        let start = self.pos;
        self.pos += 1;
        let inner = self.pos;
        let embedded = self.scan_code(CodeEnd::Brace)?;
        let source = self.source[inner..self.pos].to_string();
        self.pos += 1;

        let id = self.tree.alloc(Node::Expression(ExpressionContainer {
            source,
            embedded: embedded.clone(),
            parent: None,
            span: Some(Span::new(start, self.pos)),
        }));
        for child in embedded {
            self.tree.set_parent(child, id);
        }
        Ok(id)
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        if let Some(c) = self.peek() {
            if !is_name_start(c) {
                return String::new();
            }
        }
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.source[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn expect_byte(&mut self, expected: u8, label: &str) -> ParseResult<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(label))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.source[self.pos..].chars().next() {
            Some(found) => ParseError::unexpected_token(self.pos, expected, found.to_string()),
            None => ParseError::unexpected_eof(self.pos, expected),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }
}

fn closing_for(delim: char) -> char {
    match delim {
        '{' => '}',
        '(' => ')',
        _ => ']',
    }
}

fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'-' | b'.' | b':')
}

/// Whether `name` reads back as a single tag or attribute name
pub fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(c) if is_name_start(c) => bytes.all(is_name_char),
        _ => false,
    }
}

/// Parse module source text into a syntax tree
pub fn parse(source: &str) -> ParseResult<SyntaxTree> {
    Parser::new(source).parse_module()
}

/// Check that `source` can sit between `{` and `}` as a script expression:
/// strings and templates terminated, brackets balanced, no stray `}`
pub fn validate_expression(source: &str) -> ParseResult<()> {
    if source.trim().is_empty() {
        return Err(ParseError::unexpected_eof(0, "expression"));
    }
    let mut parser = Parser::new(source);
    parser.scan_code(CodeEnd::Eof).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(tree: &SyntaxTree) -> &Element {
        tree.element(tree.roots()[0]).expect("root element")
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("onClick"));
        assert!(is_valid_name("aria-label"));
        assert!(is_valid_name("xlink:href"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("my label"));
        assert!(!is_valid_name("1st"));
        assert!(!is_valid_name("a=b"));
    }

    #[test]
    fn test_parse_default_screen() {
        let source = "export default function Home() { return <div>Home Screen</div>; }";
        let tree = parse(source).unwrap();

        assert_eq!(tree.roots().len(), 1);
        let div = first_element(&tree);
        assert_eq!(div.tag, "div");
        assert_eq!(div.children.len(), 1);
        match tree.node(div.children[0]) {
            Some(Node::Text(text)) => assert_eq!(text.content, "Home Screen"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_attribute_forms() {
        let source = r#"const view = <button id="b1" class='btn' disabled count={3} onClick={() => go({a: 1})} {...rest}/>;"#;
        let tree = parse(source).unwrap();
        let button = first_element(&tree);

        assert!(button.self_closing);
        let attrs = &button.attributes;
        assert_eq!(attrs.len(), 6);
        assert_eq!(
            attrs[0].value,
            AttrValue::Quoted { value: "b1".to_string(), quote: '"' }
        );
        assert_eq!(
            attrs[1].value,
            AttrValue::Quoted { value: "btn".to_string(), quote: '\'' }
        );
        assert_eq!(attrs[2].value, AttrValue::Presence);
        assert_eq!(attrs[3].value, AttrValue::Expression { source: "3".to_string() });
        assert_eq!(
            attrs[4].value,
            AttrValue::Expression { source: "() => go({a: 1})".to_string() }
        );
        assert_eq!(attrs[5].value, AttrValue::Spread { source: "rest".to_string() });
        assert_eq!(attrs[1].leading, " ");
    }

    #[test]
    fn test_comparisons_and_generics_are_not_markup() {
        let source = r#"
import { useState } from "solid-js";
const small = a < b;
const [v, setV] = useState<string>("x");
export default function App() {
  return (
    <div>{v}</div>
  );
}
"#;
        let tree = parse(source).unwrap();
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(first_element(&tree).tag, "div");
    }

    #[test]
    fn test_markup_inside_expression_containers() {
        let source = "const x = <ul>{items.map(i => <li id={i}>{i}</li>)}</ul>;";
        let tree = parse(source).unwrap();
        let ul = first_element(&tree);

        let expr_id = ul.children[0];
        let expr = match tree.node(expr_id) {
            Some(Node::Expression(expr)) => expr,
            other => panic!("expected expression, got {:?}", other),
        };
        assert_eq!(expr.embedded.len(), 1);
        let li = tree.element(expr.embedded[0]).unwrap();
        assert_eq!(li.tag, "li");
        assert_eq!(li.parent, Some(expr_id));
        assert_eq!(tree.elements().len(), 2);
    }

    #[test]
    fn test_fragments_and_templates() {
        let source = "const s = `a ${b} <c>`; const f = <><span>{`t ${1}`}</span></>;";
        let tree = parse(source).unwrap();

        assert_eq!(tree.roots().len(), 1);
        let fragment = first_element(&tree);
        assert!(fragment.is_fragment());
        assert_eq!(tree.elements().len(), 2);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse("const x = <div><span></div></span>;").unwrap_err();
        assert!(matches!(err, ParseError::MismatchedClosingTag { .. }));
    }

    #[test]
    fn test_unterminated_markup() {
        let err = parse("function A() { return <div>hello").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_unbalanced_code() {
        assert!(matches!(
            parse("function A() { return 1;").unwrap_err(),
            ParseError::Unbalanced { .. }
        ));
        assert!(matches!(
            parse("const a = (1]").unwrap_err(),
            ParseError::Unbalanced { .. }
        ));
    }

    #[test]
    fn test_unterminated_string_and_comment() {
        assert!(parse("const a = \"oops;").is_err());
        assert!(parse("const a = 1; /* open").is_err());
        assert!(parse("const a = `open").is_err());
    }

    #[test]
    fn test_validate_expression() {
        assert!(validate_expression("() => console.log('clicked')").is_ok());
        assert!(validate_expression("function () { go(); }").is_ok());
        assert!(validate_expression("() => { go(").is_err());
        assert!(validate_expression("a } b").is_err());
        assert!(validate_expression("  ").is_err());
    }

    #[test]
    fn test_no_markup_is_not_an_error() {
        let tree = parse("export const answer = 42;").unwrap();
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn test_spans_cover_source() {
        let source = "const x = <div a=\"1\">\n  <b/>\n</div>;";
        let tree = parse(source).unwrap();
        let div = first_element(&tree);
        let span = div.span.unwrap();

        assert_eq!(&source[span.start..span.end], "<div a=\"1\">\n  <b/>\n</div>");
        assert_eq!(&source[div.open_tag.unwrap().start..div.open_tag.unwrap().end], "<div a=\"1\">");
        assert_eq!(div.children.len(), 3);
    }
}
