//! Attribute macros for the Corio runtime.
//!
//! - `#[corio::main]` turns an `async fn main` into a synchronous entry
//!   point driving the body on a runtime.
//! - `#[corio::test]` does the same for `async` test functions.
//!
//! Both block the calling thread until the body returns. A failure or panic
//! of the body is re-raised as a panic on that thread.

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Runs an `async fn main` on a Corio runtime.
///
/// Accepts an optional `executor` argument selecting the dispatch:
/// `"inline"` (the default) or `"thread"` for one thread per resumption.
///
/// ```rust,ignore
/// #[corio::main(executor = "thread")]
/// async fn main() {
///     let task = corio::spawn(async { 21 * 2 });
///     assert_eq!(task.await.unwrap(), 42);
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let builder = match runtime_builder(&attr.to_string()) {
        Ok(builder) => builder,
        Err(message) => return compile_error(&message),
    };

    block_on_body(item, &builder)
}

/// Runs an `async` test function on an inline Corio runtime.
///
/// ```rust,ignore
/// #[corio::test]
/// async fn answers() {
///     assert_eq!(corio::spawn(async { 42 }).await.unwrap(), 42);
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let builder = match runtime_builder(&attr.to_string()) {
        Ok(builder) => builder,
        Err(message) => return compile_error(&message),
    };

    let test_attr: TokenStream = "#[test]".parse().unwrap();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(block_on_body(item, &builder));

    result.into_iter().collect()
}

/// Translates the attribute arguments into a `RuntimeBuilder` expression.
fn runtime_builder(attr: &str) -> Result<String, String> {
    let mut builder = String::from("::corio::RuntimeBuilder::new()");

    for part in attr.split(',') {
        let part = part.trim();

        if part.is_empty() {
            continue;
        }

        let Some(value) = part.strip_prefix("executor") else {
            return Err(format!("unknown corio attribute argument `{part}`"));
        };

        match value.trim_start().trim_start_matches('=').trim() {
            "\"inline\"" => builder.push_str(".inline()"),
            "\"thread\"" => builder.push_str(".thread_per_task()"),
            other => {
                return Err(format!(
                    "unknown executor {other}, expected \"inline\" or \"thread\""
                ));
            }
        }
    }

    builder.push_str(".build()");
    Ok(builder)
}

/// Drops the `async` keyword and wraps the function body in
/// `runtime.block_on`.
fn block_on_body(item: TokenStream, builder: &str) -> TokenStream {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    if let Some(pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        tokens.remove(pos);
    }

    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return compile_error("expected a function body");
    };

    let block = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let new_block = format!(
        "{{
            let runtime = {builder};
            match runtime.block_on(async move {{ {block} }}) {{
                ::core::result::Result::Ok(value) => value,
                ::core::result::Result::Err(failure) => ::core::panic!(\"{{}}\", failure),
            }}
        }}"
    );

    let stream = match new_block.parse() {
        Ok(stream) => stream,
        Err(err) => return compile_error(&format!("corio macro error: {err}")),
    };

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, stream));
    tokens.into_iter().collect()
}

fn compile_error(message: &str) -> TokenStream {
    format!("::core::compile_error!({message:?});").parse().unwrap()
}
