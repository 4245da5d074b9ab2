//! Expression parsing.
//!
//! Operator precedence, loosest first:
//! - Logical: or, and, not
//! - Comparison: ==, !=, <, <=, >, >= (chainable), in, not in, matches
//! - Additive: +, -
//! - Multiplicative: *, /, %
//! - Unary: -
//! - Postfix: field access (.), indexing ([]), filter pipes (|)
//! - Primary: literals, roots, function calls, lists, parentheses

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;

impl Parser {
    /// Parse an expression.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;

        while self.check(&TokenKind::Or) {
            let start = left.span();
            self.advance();
            let right = self.parse_and()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(BinaryOp::Or, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_not()?;

        while self.check(&TokenKind::And) {
            let start = left.span();
            self.advance();
            let right = self.parse_not()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(BinaryOp::And, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_not(&mut self) -> ParseResult<Expr> {
        if self.check(&TokenKind::Not) {
            let start = self.advance().span;
            let expr = self.parse_not()?;
            let span = self.span_from(start);
            Ok(Expr::UnaryOp(UnaryOp::Not, Box::new(expr), span))
        } else {
            self.parse_comparison()
        }
    }

    fn compare_op(&self) -> Option<CompareOp> {
        match self.peek().kind {
            TokenKind::Eq => Some(CompareOp::Eq),
            TokenKind::NotEq => Some(CompareOp::NotEq),
            TokenKind::Lt => Some(CompareOp::Lt),
            TokenKind::LtEq => Some(CompareOp::LtEq),
            TokenKind::Gt => Some(CompareOp::Gt),
            TokenKind::GtEq => Some(CompareOp::GtEq),
            _ => None,
        }
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let left = self.parse_additive()?;
        let start = left.span();

        // a < b <= c keeps every operand so it can be evaluated pairwise
        let mut rest = Vec::new();
        while let Some(op) = self.compare_op() {
            self.advance();
            rest.push((op, self.parse_additive()?));
        }
        let mut left = if rest.is_empty() {
            left
        } else {
            let span = self.span_from(start);
            Expr::Compare(Box::new(left), rest, span)
        };

        // Membership and regex operators bind at comparison level
        if self.check(&TokenKind::In) {
            self.advance();
            let right = self.parse_additive()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(BinaryOp::In, Box::new(left), Box::new(right), span);
        } else if self.check(&TokenKind::Not) && matches!(self.peek_next(), TokenKind::In) {
            self.advance();
            self.advance();
            let right = self.parse_additive()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(BinaryOp::NotIn, Box::new(left), Box::new(right), span);
        } else if self.check(&TokenKind::Matches) {
            self.advance();
            let token = self.advance();
            let source = match token.kind {
                TokenKind::String(s) => s,
                other => {
                    return Err(ParseError::unexpected_token(
                        token.span,
                        "string pattern",
                        other.name(),
                    ));
                }
            };
            let pattern = Pattern::new(source.as_str())
                .map_err(|e| ParseError::invalid_regex(token.span, &source, e))?;
            let span = self.span_from(start);
            left = Expr::Matches(Box::new(left), pattern, span);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = if self.check(&TokenKind::Plus) {
                BinaryOp::Add
            } else if self.check(&TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };

            let start = left.span();
            self.advance();
            let right = self.parse_multiplicative()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(op, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = if self.check(&TokenKind::Star) {
                BinaryOp::Mul
            } else if self.check(&TokenKind::Slash) {
                BinaryOp::Div
            } else if self.check(&TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };

            let start = left.span();
            self.advance();
            let right = self.parse_unary()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(op, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.check(&TokenKind::Minus) {
            let start = self.advance().span;
            let expr = self.parse_unary()?;
            let span = self.span_from(start);
            Ok(Expr::UnaryOp(UnaryOp::Neg, Box::new(expr), span))
        } else {
            self.parse_postfix()
        }
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            let start = expr.span();
            if self.check(&TokenKind::Dot) {
                self.advance();
                let name = self.expect_name()?;
                let span = self.span_from(start);
                expr = Expr::Field(Box::new(expr), name, span);
            } else if self.check(&TokenKind::LBracket) {
                self.advance();
                let index = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                let span = self.span_from(start);
                expr = Expr::Index(Box::new(expr), Box::new(index), span);
            } else if self.check(&TokenKind::Pipe) {
                // x|f(a, b) is f(x, a, b)
                self.advance();
                let name = self.expect_ident()?;
                let mut args = vec![expr];
                if self.check(&TokenKind::LParen) {
                    self.advance();
                    args.extend(self.parse_args()?);
                }
                let span = self.span_from(start);
                expr = Expr::FnCall(FnCall { name, args, span });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse comma-separated arguments after an opening parenthesis,
    /// consuming the closing one.
    fn parse_args(&mut self) -> ParseResult<Vec<Expr>> {
        self.parse_sequence(&TokenKind::RParen)
    }

    fn parse_sequence(&mut self, close: &TokenKind) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        if !self.check(close) {
            items.push(self.parse_expr()?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                if self.check(close) {
                    break;
                }
                items.push(self.parse_expr()?);
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        let literal = |kind| {
            Expr::Literal(Literal {
                kind,
                span: token.span,
            })
        };

        match &token.kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(literal(LiteralKind::Int(*n)))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(literal(LiteralKind::Float(*f)))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(literal(LiteralKind::String(s.clone())))
            }
            TokenKind::True => {
                self.advance();
                Ok(literal(LiteralKind::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(literal(LiteralKind::Bool(false)))
            }
            TokenKind::Null => {
                self.advance();
                Ok(literal(LiteralKind::Null))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance();
                let items = self.parse_sequence(&TokenKind::RBracket)?;
                let span = self.span_from(token.span);
                Ok(Expr::List(items, span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                match name.as_str() {
                    "this" => Ok(Expr::Root(Root::This, token.span)),
                    "block" => Ok(Expr::Root(Root::Block, token.span)),
                    "root" => Ok(Expr::Root(Root::Root, token.span)),
                    _ if self.check(&TokenKind::LParen) => {
                        self.advance();
                        let args = self.parse_args()?;
                        let span = self.span_from(token.span);
                        Ok(Expr::FnCall(FnCall {
                            name: name.clone(),
                            args,
                            span,
                        }))
                    }
                    _ => Err(ParseError::unknown_name(token.span, name)),
                }
            }
            other => Err(ParseError::unexpected_token(
                token.span,
                "expression",
                other.name(),
            )),
        }
    }
}
