// Formula parser - converts formula strings into AST
// Supports: numbers, cell refs (A1), ranges (A1:A5), range functions
// (SUM, AVERAGE, MIN, MAX), basic math (+, -, *, /)

use labgrid_core::addr::letters_to_col;

use crate::error::FormulaError;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    CellRef {
        row: usize,
        col: usize,
    },
    Range {
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    },
    Function {
        name: String,
        args: Vec<Expr>,
    },
    BinaryOp {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parse a formula string (leading `=` required) into an AST.
pub fn parse(formula: &str) -> Result<Expr, FormulaError> {
    let formula = formula.trim();
    if !formula.starts_with('=') {
        return Err(FormulaError::MissingEquals);
    }

    let input = &formula[1..];
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }
    let (expr, pos) = parse_add_sub(&tokens, 0)?;
    if pos != tokens.len() {
        return Err(FormulaError::Expected { expected: "end of formula" });
    }
    Ok(expr)
}

#[derive(Debug, Clone)]
enum Token {
    Number(f64),
    CellRef { row: usize, col: usize },
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Colon,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => { chars.next(); }
            '+' => { tokens.push(Token::Plus); chars.next(); }
            '-' => { tokens.push(Token::Minus); chars.next(); }
            '*' => { tokens.push(Token::Star); chars.next(); }
            '/' => { tokens.push(Token::Slash); chars.next(); }
            '(' => { tokens.push(Token::LParen); chars.next(); }
            ')' => { tokens.push(Token::RParen); chars.next(); }
            ':' => { tokens.push(Token::Colon); chars.next(); }
            ',' => { tokens.push(Token::Comma); chars.next(); }
            'A'..='Z' | 'a'..='z' => {
                // Cell reference (A1) or function name (SUM)
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(token) = try_parse_cell_ref(&ident) {
                    tokens.push(token);
                } else {
                    tokens.push(Token::Ident(ident.to_uppercase()));
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
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| FormulaError::InvalidNumber(num_str))?;
                tokens.push(Token::Number(num));
            }
            _ => return Err(FormulaError::UnexpectedChar(c)),
        }
    }

    Ok(tokens)
}

fn try_parse_cell_ref(s: &str) -> Option<Token> {
    let s = s.to_uppercase();
    let split = s.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = s.split_at(split);
    if letters.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    let col = letters_to_col(letters)?;
    Some(Token::CellRef { row: row - 1, col })
}

fn parse_add_sub(tokens: &[Token], pos: usize) -> Result<(Expr, usize), FormulaError> {
    let (mut left, mut pos) = parse_mul_div(tokens, pos)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Plus => Op::Add,
            Token::Minus => Op::Sub,
            _ => break,
        };
        let (right, new_pos) = parse_mul_div(tokens, pos + 1)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_mul_div(tokens: &[Token], pos: usize) -> Result<(Expr, usize), FormulaError> {
    let (mut left, mut pos) = parse_primary(tokens, pos)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Star => Op::Mul,
            Token::Slash => Op::Div,
            _ => break,
        };
        let (right, new_pos) = parse_primary(tokens, pos + 1)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_primary(tokens: &[Token], pos: usize) -> Result<(Expr, usize), FormulaError> {
    if pos >= tokens.len() {
        return Err(FormulaError::UnexpectedEnd);
    }

    match &tokens[pos] {
        Token::Number(n) => Ok((Expr::Number(*n), pos + 1)),
        Token::CellRef { row, col } => {
            // Check if this is a range (A1:B5)
            if pos + 2 < tokens.len() {
                if let Token::Colon = &tokens[pos + 1] {
                    if let Token::CellRef { row: end_row, col: end_col } = &tokens[pos + 2] {
                        return Ok((
                            Expr::Range {
                                start_row: *row,
                                start_col: *col,
                                end_row: *end_row,
                                end_col: *end_col,
                            },
                            pos + 3,
                        ));
                    }
                }
            }
            Ok((Expr::CellRef { row: *row, col: *col }, pos + 1))
        }
        Token::Ident(name) => {
            if pos + 1 < tokens.len() {
                if let Token::LParen = &tokens[pos + 1] {
                    let (args, new_pos) = parse_function_args(tokens, pos + 2)?;
                    return Ok((
                        Expr::Function {
                            name: name.clone(),
                            args,
                        },
                        new_pos,
                    ));
                }
            }
            Err(FormulaError::Expected { expected: "function call" })
        }
        Token::LParen => {
            let (expr, pos) = parse_add_sub(tokens, pos + 1)?;
            match tokens.get(pos) {
                Some(Token::RParen) => Ok((expr, pos + 1)),
                _ => Err(FormulaError::Expected { expected: "closing parenthesis" }),
            }
        }
        Token::Plus => parse_primary(tokens, pos + 1),
        Token::Minus => {
            let (expr, pos) = parse_primary(tokens, pos + 1)?;
            Ok((
                Expr::BinaryOp {
                    op: Op::Sub,
                    left: Box::new(Expr::Number(0.0)),
                    right: Box::new(expr),
                },
                pos,
            ))
        }
        _ => Err(FormulaError::Expected { expected: "number, cell reference, or function" }),
    }
}

fn parse_function_args(tokens: &[Token], pos: usize) -> Result<(Vec<Expr>, usize), FormulaError> {
    let mut args = Vec::new();
    let mut pos = pos;

    // Empty argument list: FUNC()
    if let Some(Token::RParen) = tokens.get(pos) {
        return Ok((args, pos + 1));
    }

    loop {
        let (arg, new_pos) = parse_add_sub(tokens, pos)?;
        args.push(arg);
        pos = new_pos;

        match tokens.get(pos) {
            Some(Token::Comma) => pos += 1,
            Some(Token::RParen) => return Ok((args, pos + 1)),
            _ => return Err(FormulaError::Expected { expected: "comma or closing parenthesis" }),
        }
    }
}
