// Pass-condition expression evaluator.
//
// A small recursive-descent evaluator over a closed grammar: numbers,
// identifiers, + - * / ( ), comparisons (< > <= >= == !=), && || and !.
// Anything outside that grammar fails tokenization, so unsafe input is
// unrepresentable rather than filtered. Comparisons and logical operators
// produce 1.0/0.0; any nonzero result is truthy.

/// Evaluate a condition against a variable resolver. Returns `None` on any
/// tokenizer, parser, or resolution failure; the caller treats that as a
/// failed condition.
pub fn evaluate<F>(input: &str, resolve: F) -> Option<bool>
where
    F: Fn(&str) -> Option<f64>,
{
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return None;
    }
    let (value, pos) = parse_or(&tokens, 0, &resolve)?;
    if pos != tokens.len() {
        return None;
    }
    Some(value != 0.0)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Bang,
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' | '\n' => { chars.next(); }
            '+' => { tokens.push(Token::Plus); chars.next(); }
            '-' => { tokens.push(Token::Minus); chars.next(); }
            '*' => { tokens.push(Token::Star); chars.next(); }
            '/' => { tokens.push(Token::Slash); chars.next(); }
            '(' => { tokens.push(Token::LParen); chars.next(); }
            ')' => { tokens.push(Token::RParen); chars.next(); }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    tokens.push(Token::LtEq);
                    chars.next();
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    tokens.push(Token::GtEq);
                    chars.next();
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '=' => {
                chars.next();
                // Only == exists; a single = is not part of the grammar.
                if chars.peek() == Some(&'=') {
                    tokens.push(Token::EqEq);
                    chars.next();
                } else {
                    return None;
                }
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    tokens.push(Token::NotEq);
                    chars.next();
                } else {
                    tokens.push(Token::Bang);
                }
            }
            '&' => {
                chars.next();
                if chars.peek() == Some(&'&') {
                    tokens.push(Token::AndAnd);
                    chars.next();
                } else {
                    return None;
                }
            }
            '|' => {
                chars.next();
                if chars.peek() == Some(&'|') {
                    tokens.push(Token::OrOr);
                    chars.next();
                } else {
                    return None;
                }
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num_str.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(num_str.parse().ok()?));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            // Any character outside the whitelist rejects the whole
            // expression before anything is evaluated.
            _ => return None,
        }
    }

    Some(tokens)
}

type Step = Option<(f64, usize)>;

fn parse_or<F>(tokens: &[Token], pos: usize, resolve: &F) -> Step
where
    F: Fn(&str) -> Option<f64>,
{
    let (mut left, mut pos) = parse_and(tokens, pos, resolve)?;
    while tokens.get(pos) == Some(&Token::OrOr) {
        let (right, new_pos) = parse_and(tokens, pos + 1, resolve)?;
        left = bool_num(left != 0.0 || right != 0.0);
        pos = new_pos;
    }
    Some((left, pos))
}

fn parse_and<F>(tokens: &[Token], pos: usize, resolve: &F) -> Step
where
    F: Fn(&str) -> Option<f64>,
{
    let (mut left, mut pos) = parse_comparison(tokens, pos, resolve)?;
    while tokens.get(pos) == Some(&Token::AndAnd) {
        let (right, new_pos) = parse_comparison(tokens, pos + 1, resolve)?;
        left = bool_num(left != 0.0 && right != 0.0);
        pos = new_pos;
    }
    Some((left, pos))
}

fn parse_comparison<F>(tokens: &[Token], pos: usize, resolve: &F) -> Step
where
    F: Fn(&str) -> Option<f64>,
{
    let (left, pos) = parse_add_sub(tokens, pos, resolve)?;
    let cmp = match tokens.get(pos) {
        Some(Token::Lt) => f64::lt as fn(&f64, &f64) -> bool,
        Some(Token::Gt) => f64::gt,
        Some(Token::LtEq) => f64::le,
        Some(Token::GtEq) => f64::ge,
        Some(Token::EqEq) => f64::eq,
        Some(Token::NotEq) => f64::ne,
        _ => return Some((left, pos)),
    };
    let (right, pos) = parse_add_sub(tokens, pos + 1, resolve)?;
    // Comparison is non-associative: a chain like `90 < x < 100` would
    // compare a boolean against a number, so it rejects instead.
    if is_comparison(tokens.get(pos)) {
        return None;
    }
    Some((bool_num(cmp(&left, &right)), pos))
}

fn is_comparison(token: Option<&Token>) -> bool {
    matches!(
        token,
        Some(Token::Lt)
            | Some(Token::Gt)
            | Some(Token::LtEq)
            | Some(Token::GtEq)
            | Some(Token::EqEq)
            | Some(Token::NotEq)
    )
}

fn parse_add_sub<F>(tokens: &[Token], pos: usize, resolve: &F) -> Step
where
    F: Fn(&str) -> Option<f64>,
{
    let (mut left, mut pos) = parse_mul_div(tokens, pos, resolve)?;
    loop {
        let add = match tokens.get(pos) {
            Some(Token::Plus) => true,
            Some(Token::Minus) => false,
            _ => break,
        };
        let (right, new_pos) = parse_mul_div(tokens, pos + 1, resolve)?;
        left = if add { left + right } else { left - right };
        pos = new_pos;
    }
    Some((left, pos))
}

fn parse_mul_div<F>(tokens: &[Token], pos: usize, resolve: &F) -> Step
where
    F: Fn(&str) -> Option<f64>,
{
    let (mut left, mut pos) = parse_unary(tokens, pos, resolve)?;
    loop {
        let mul = match tokens.get(pos) {
            Some(Token::Star) => true,
            Some(Token::Slash) => false,
            _ => break,
        };
        let (right, new_pos) = parse_unary(tokens, pos + 1, resolve)?;
        if mul {
            left *= right;
        } else {
            // Division by zero fails the condition rather than yielding
            // an infinity that could compare as a pass.
            if right == 0.0 {
                return None;
            }
            left /= right;
        }
        pos = new_pos;
    }
    Some((left, pos))
}

fn parse_unary<F>(tokens: &[Token], pos: usize, resolve: &F) -> Step
where
    F: Fn(&str) -> Option<f64>,
{
    match tokens.get(pos)? {
        Token::Bang => {
            let (value, pos) = parse_unary(tokens, pos + 1, resolve)?;
            Some((bool_num(value == 0.0), pos))
        }
        Token::Minus => {
            let (value, pos) = parse_unary(tokens, pos + 1, resolve)?;
            Some((-value, pos))
        }
        _ => parse_primary(tokens, pos, resolve),
    }
}

fn parse_primary<F>(tokens: &[Token], pos: usize, resolve: &F) -> Step
where
    F: Fn(&str) -> Option<f64>,
{
    match tokens.get(pos)? {
        Token::Number(n) => Some((*n, pos + 1)),
        // Unknown names reject the whole expression (fail closed).
        Token::Ident(name) => Some((resolve(name)?, pos + 1)),
        Token::LParen => {
            let (value, pos) = parse_or(tokens, pos + 1, resolve)?;
            match tokens.get(pos) {
                Some(Token::RParen) => Some((value, pos + 1)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn bool_num(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
