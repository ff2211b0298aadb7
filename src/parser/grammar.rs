//! Parser implementation using chumsky
//!
//! ```text
//! target = [add_after +] [multiply *] (source [+ add_before])
//! target = [add_after +] [multiply *] operand
//! ```

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::layout::{Attribute, AttributeRef, Constraint, Reference};
use crate::parser::lexer::Token;

/// What follows a multiplier, or stands alone
#[derive(Debug, Clone)]
enum Term {
    Single(Reference),
    /// `(source [+ add_before])`
    Group(Reference, Option<Reference>),
}

/// One side of a top-level `+`
#[derive(Debug, Clone)]
enum Summand {
    Term(Term),
    Product(Reference, Term),
}

impl Summand {
    fn as_single(&self) -> Option<&Reference> {
        match self {
            Summand::Term(Term::Single(r)) => Some(r),
            _ => None,
        }
    }
}

const FORM: &str = "expected the form `target = add_after + multiply * (source + add_before)`";

/// Parse one constraint, e.g. `axis-1.x = spacing + axis-0.right`
pub fn parse_constraint(input: &str) -> Result<Constraint, Vec<crate::ParseError>> {
    let len = input.len();
    let tokens = crate::parser::lexer::lex(input).map_err(|e| vec![e])?;
    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    constraint_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

fn constraint_parser<'a, I>() -> impl Parser<'a, I, Constraint, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => s,
    };

    let number = just(Token::Minus)
        .or_not()
        .then(select! { Token::Number(n) => n })
        .map(|(neg, n)| if neg.is_some() { -n } else { n });

    let attribute_ref = identifier
        .clone()
        .then_ignore(just(Token::Dot))
        .then(identifier.clone())
        .try_map(|(id, name), span: SimpleSpan| {
            attribute(id, &name).map_err(|msg| Rich::custom(span, msg))
        });

    // an id followed by `.` is always an attribute, never a constant
    let operand = choice((
        number.map(Reference::Literal),
        identifier
            .clone()
            .then(just(Token::Dot).ignore_then(identifier).or_not())
            .try_map(|(id, name), span: SimpleSpan| match name {
                None => Ok(Reference::Constant(id)),
                Some(name) => attribute(id, &name)
                    .map(Reference::Attribute)
                    .map_err(|msg| Rich::custom(span, msg)),
            }),
    ));

    let group = operand
        .clone()
        .then(just(Token::Plus).ignore_then(operand.clone()).or_not())
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
        .map(|(source, add_before)| Term::Group(source, add_before));

    let term = choice((group, operand.clone().map(Term::Single)));

    let summand = choice((
        operand
            .then_ignore(just(Token::Star))
            .then(term.clone())
            .map(|(multiply, term)| Summand::Product(multiply, term)),
        term.map(Summand::Term),
    ));

    attribute_ref
        .then_ignore(just(Token::Equals))
        .then(
            summand
                .separated_by(just(Token::Plus))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
        .try_map(|(target, summands), span: SimpleSpan| {
            assemble(target, summands).map_err(|msg| Rich::custom(span, msg))
        })
}

fn attribute(id: String, name: &str) -> Result<AttributeRef, String> {
    if let Some(attr) = Attribute::parse(name) {
        return Ok(AttributeRef::new(id, attr));
    }
    // `b.right-0.1` lexes as the id-like `right-0`
    match name.split_once('-').filter(|(attr, _)| Attribute::parse(attr).is_some()) {
        Some((attr, _)) => Err(format!(
            "'{}' is not an attribute. Offsets are added, e.g. `{}.{} + -0.1`",
            name, id, attr
        )),
        None => Err(format!(
            "'{}' is not an attribute. Expected one of: {}",
            name,
            Attribute::ALL.map(Attribute::as_str).join(", ")
        )),
    }
}

/// Map the parsed summands onto the constraint slots
fn assemble(target: AttributeRef, summands: Vec<Summand>) -> Result<Constraint, String> {
    let mut constraint = Constraint::new(target, None);

    let rest = match summands.as_slice() {
        [only] => only.clone(),
        [a, b] => match (a.as_single(), b.as_single()) {
            // `a.x + 0.1` reads as `(a.x + 0.1)`
            (Some(first), Some(second))
                if first.as_attribute().is_some() && second.as_attribute().is_none() =>
            {
                Summand::Term(Term::Group(first.clone(), Some(second.clone())))
            }
            (Some(first), _) => {
                constraint.add_after = first.clone();
                b.clone()
            }
            (None, Some(second)) => {
                constraint.add_after = second.clone();
                a.clone()
            }
            (None, None) => return Err(format!("only one product or group allowed; {}", FORM)),
        },
        _ => return Err(format!("too many terms; {}", FORM)),
    };

    let term = match rest {
        Summand::Term(term) => term,
        Summand::Product(multiply, term) => {
            constraint.multiply = multiply;
            term
        }
    };

    match term {
        Term::Single(r @ Reference::Attribute(_)) => constraint.source = Some(r),
        Term::Single(r) => constraint.add_before = r,
        Term::Group(source, add_before) => {
            constraint.source = Some(source);
            if let Some(add_before) = add_before {
                constraint.add_before = add_before;
            }
        }
    }

    Ok(constraint)
}
