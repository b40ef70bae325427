use proc_macro::Delimiter;
use proc_macro::Group;
use proc_macro::Ident;
use proc_macro::Literal;
use proc_macro::Punct;
use proc_macro::Spacing;
use proc_macro::Span;
use proc_macro::TokenStream;
use proc_macro::TokenTree;

/// Repeats the body of the annotated function `count` times in place.
///
/// `#[loop_unroll(i, start, count)]` or `#[loop_unroll(i, start, count, step)]`.
/// The function item itself is discarded; only its braced body is emitted,
/// once per iteration, inside a single block. Before the first copy `i` is
/// bound to `start` and after every copy but the last it is advanced by
/// `step` (1 when omitted). Use `_` as the index name when the body does not
/// need it.
#[proc_macro_attribute]
pub fn loop_unroll(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match UnrollArgs::parse(attr) {
        Ok(args) => args,
        Err(msg) => return compile_error(msg),
    };
    let body = match fn_body(item) {
        Some(body) => body,
        None => return compile_error("loop_unroll expects a function with a braced body"),
    };

    let mut output = TokenStream::new();
    if let Some(index) = &args.index {
        // let mut <index> = <start>;
        output.extend([
            TokenTree::Ident(Ident::new("let", Span::call_site())),
            TokenTree::Ident(Ident::new("mut", Span::call_site())),
            TokenTree::Ident(index.clone()),
            TokenTree::Punct(Punct::new('=', Spacing::Alone)),
            TokenTree::Literal(args.start.clone()),
            TokenTree::Punct(Punct::new(';', Spacing::Alone)),
        ]);
    }

    for n in 0..args.count {
        output.extend(TokenStream::from(TokenTree::Group(body.clone())));
        let last = n + 1 == args.count;
        if let (Some(index), false) = (&args.index, last) {
            // <index> += <step>;
            output.extend([
                TokenTree::Ident(index.clone()),
                TokenTree::Punct(Punct::new('+', Spacing::Joint)),
                TokenTree::Punct(Punct::new('=', Spacing::Alone)),
                TokenTree::Literal(Literal::usize_unsuffixed(args.step)),
                TokenTree::Punct(Punct::new(';', Spacing::Alone)),
            ]);
        }
    }

    TokenStream::from(TokenTree::Group(Group::new(Delimiter::Brace, output)))
}

struct UnrollArgs {
    index: Option<Ident>,
    start: Literal,
    count: usize,
    step: usize,
}

impl UnrollArgs {
    fn parse(attr: TokenStream) -> Result<Self, &'static str> {
        let parts: Vec<TokenTree> = attr
            .into_iter()
            .filter(|tt| !matches!(tt, TokenTree::Punct(p) if p.as_char() == ','))
            .collect();

        let index = match parts.first() {
            Some(TokenTree::Ident(ident)) => Some(ident.clone()),
            Some(TokenTree::Punct(p)) if p.as_char() == '_' => None,
            _ => return Err("first argument must be an identifier or `_`"),
        };
        // `_` arrives as an Ident on current compilers
        let index = index.filter(|ident| ident.to_string() != "_");

        let start = match parts.get(1) {
            Some(TokenTree::Literal(lit)) => lit.clone(),
            _ => return Err("second argument must be an integer literal"),
        };
        let count = match parts.get(2) {
            Some(TokenTree::Literal(lit)) => parse_usize(lit).ok_or("third argument must be an integer literal")?,
            _ => return Err("third argument must be an integer literal"),
        };
        let step = match parts.get(3) {
            Some(TokenTree::Literal(lit)) => parse_usize(lit).ok_or("fourth argument must be an integer literal")?,
            Some(_) => return Err("fourth argument must be an integer literal"),
            None => 1,
        };
        if count == 0 {
            return Err("loop count must be at least 1");
        }

        Ok(Self { index, start, count, step })
    }
}

fn parse_usize(lit: &Literal) -> Option<usize> {
    let text = lit.to_string();
    let digits = text.trim_end_matches("usize").replace('_', "");
    digits.parse().ok()
}

fn fn_body(item: TokenStream) -> Option<Group> {
    item.into_iter().find_map(|tt| match tt {
        TokenTree::Group(group) if group.delimiter() == Delimiter::Brace => Some(group),
        _ => None,
    })
}

fn compile_error(msg: &str) -> TokenStream {
    let span = Span::call_site();
    let mut lit = Literal::string(msg);
    lit.set_span(span);
    let args = TokenStream::from(TokenTree::Literal(lit));
    TokenStream::from_iter([
        TokenTree::Ident(Ident::new("compile_error", span)),
        TokenTree::Punct(Punct::new('!', Spacing::Alone)),
        TokenTree::Group(Group::new(Delimiter::Parenthesis, args)),
        TokenTree::Punct(Punct::new(';', Spacing::Alone)),
    ])
}
