use crate::ast::*;
use crate::lexer::{LexError, Lexer, Token};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Unexpected token: {0:?}, expected {1}")]
    Unexpected(Token, &'static str),
    #[error("Unexpected end of input")]
    UnexpectedEof,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> &Token {
        let tok = self.tokens.get(self.pos).unwrap_or(&Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Ident(s) => Ok(s),
            tok => Err(ParseError::Unexpected(tok, "identifier")),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        let tok = self.advance().clone();
        if tok == expected {
            Ok(())
        } else {
            Err(ParseError::Unexpected(tok, "specific token"))
        }
    }

    fn check_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s == name)
    }

    pub fn parse(&mut self) -> Result<Schema, ParseError> {
        let mut declarations = Vec::new();

        while *self.peek() != Token::Eof {
            if self.check_ident("generator") {
                self.advance();
                declarations.push(Declaration::Generator(self.parse_block()?));
            } else if self.check_ident("datasource") {
                self.advance();
                declarations.push(Declaration::Datasource(self.parse_block()?));
            } else if self.check_ident("model") {
                self.advance();
                declarations.push(Declaration::Model(self.parse_model()?));
            } else {
                return Err(ParseError::Unexpected(
                    self.peek().clone(),
                    "generator, datasource, or model",
                ));
            }
        }

        Ok(Schema { declarations })
    }

    /// Parse a config block body: `name { key = value ... }`
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LBrace)?;

        let mut assignments = Vec::new();
        while *self.peek() != Token::RBrace {
            let key = self.expect_ident()?;
            self.expect(Token::Eq)?;
            let value = self.parse_argument()?;
            assignments.push(Assignment { key, value });
        }

        self.expect(Token::RBrace)?;
        Ok(Block { name, assignments })
    }

    fn parse_model(&mut self) -> Result<Model, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LBrace)?;

        let mut properties = Vec::new();
        while *self.peek() != Token::RBrace {
            if *self.peek() == Token::AtAt {
                self.advance();
                properties.push(Property::Attribute(self.parse_attribute()?));
            } else {
                properties.push(Property::Field(self.parse_field()?));
            }
        }

        self.expect(Token::RBrace)?;
        Ok(Model { name, properties })
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let name = self.expect_ident()?;
        let typ = self.expect_ident()?;

        let mut array = false;
        let mut optional = false;

        if *self.peek() == Token::LBracket {
            self.advance();
            self.expect(Token::RBracket)?;
            array = true;
        }
        if *self.peek() == Token::Question {
            self.advance();
            optional = true;
        }

        let mut attributes = Vec::new();
        while *self.peek() == Token::At {
            self.advance();
            attributes.push(self.parse_attribute()?);
        }

        Ok(Field {
            name,
            typ,
            optional,
            array,
            attributes,
        })
    }

    /// Parse an attribute body (after `@` or `@@`): `name` or `name(arg, ...)`
    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let name = self.expect_ident()?;
        let mut args = Vec::new();

        if *self.peek() == Token::LParen {
            self.advance();
            while *self.peek() != Token::RParen {
                args.push(self.parse_argument()?);
                if *self.peek() == Token::Comma {
                    self.advance();
                }
            }
            self.expect(Token::RParen)?;
        }

        Ok(Attribute { name, args })
    }

    fn parse_argument(&mut self) -> Result<Argument, ParseError> {
        match self.advance().clone() {
            Token::Str(s) => Ok(Argument::Str(s)),
            Token::Num(n) => Ok(Argument::Int(n)),
            Token::LBracket => {
                let mut items = Vec::new();
                while *self.peek() != Token::RBracket {
                    items.push(self.parse_argument()?);
                    if *self.peek() == Token::Comma {
                        self.advance();
                    }
                }
                self.expect(Token::RBracket)?;
                Ok(Argument::List(items))
            }
            Token::Ident(name) => {
                if *self.peek() == Token::Colon {
                    self.advance();
                    let value = self.parse_argument()?;
                    Ok(Argument::KeyValue(name, Box::new(value)))
                } else if *self.peek() == Token::LParen {
                    self.advance();
                    let mut args = Vec::new();
                    while *self.peek() != Token::RParen {
                        args.push(self.parse_argument()?);
                        if *self.peek() == Token::Comma {
                            self.advance();
                        }
                    }
                    self.expect(Token::RParen)?;
                    Ok(Argument::Call(name, args))
                } else {
                    Ok(Argument::Ident(name))
                }
            }
            Token::Eof => Err(ParseError::UnexpectedEof),
            tok => Err(ParseError::Unexpected(tok, "argument")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_blocks() {
        let input = r#"
            generator client {
                provider = "prisma-client-js"
            }

            datasource db {
                provider = "postgresql"
                url = env("DATABASE_URL")
            }
        "#;
        let schema = Parser::new(input).unwrap().parse().unwrap();
        assert_eq!(schema.declarations.len(), 2);

        match &schema.declarations[1] {
            Declaration::Datasource(block) => {
                assert_eq!(block.name, "db");
                assert_eq!(block.assignments.len(), 2);
                assert_eq!(
                    block.assignments[1].value,
                    Argument::Call("env".into(), vec![Argument::Str("DATABASE_URL".into())])
                );
            }
            other => panic!("expected datasource, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_model_fields() {
        let input = r#"
            model Product {
                id    Int     @id @default(autoincrement())
                title String
                price Int?
                tags  String[]
            }
        "#;
        let schema = Parser::new(input).unwrap().parse().unwrap();
        let model = schema.model("Product").unwrap();
        assert_eq!(model.fields().count(), 4);

        let id = model.field("id").unwrap();
        assert_eq!(id.attributes.len(), 2);
        assert_eq!(id.attributes[0], Attribute::bare("id"));
        assert_eq!(
            id.attributes[1].args,
            vec![Argument::Call("autoincrement".into(), vec![])]
        );

        assert!(model.field("price").unwrap().optional);
        assert!(model.field("tags").unwrap().array);
    }

    #[test]
    fn test_parse_relation_attribute() {
        let input = r#"
            model Product {
                category   Category @relation("Product_category", fields: [categoryId], references: [id])
                categoryId Int
            }
        "#;
        let schema = Parser::new(input).unwrap().parse().unwrap();
        let field = schema.model("Product").unwrap().field("category").unwrap();
        let rel = field.attribute("relation").unwrap();

        assert_eq!(rel.args[0], Argument::Str("Product_category".into()));
        assert_eq!(
            rel.args[1],
            Argument::KeyValue(
                "fields".into(),
                Box::new(Argument::List(vec![Argument::Ident("categoryId".into())]))
            )
        );
        assert_eq!(
            rel.args[2],
            Argument::KeyValue(
                "references".into(),
                Box::new(Argument::List(vec![Argument::Ident("id".into())]))
            )
        );
    }

    #[test]
    fn test_parse_block_attribute() {
        let input = r#"
            model Review {
                userId    Int
                productId Int
                @@unique([userId, productId])
            }
        "#;
        let schema = Parser::new(input).unwrap().parse().unwrap();
        let model = schema.model("Review").unwrap();
        assert_eq!(model.fields().count(), 2);

        let attr = model
            .properties
            .iter()
            .find_map(|p| match p {
                Property::Attribute(a) => Some(a),
                _ => None,
            })
            .unwrap();
        assert_eq!(attr.name, "unique");
    }

    #[test]
    fn test_parse_unicode_model() {
        let input = r#"
            model ユーザー {
                名前 String
            }
        "#;
        let schema = Parser::new(input).unwrap().parse().unwrap();
        assert!(schema.model("ユーザー").unwrap().has_field("名前"));
    }

    #[test]
    fn test_reject_stray_toplevel() {
        let err = Parser::new("enum Role { ADMIN }").unwrap().parse().unwrap_err();
        assert!(matches!(err, ParseError::Unexpected(..)));
    }
}
