//! Procedural macros for `advent-framework`.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::parse::Parse;
use syn::{Error, Expr, Item, ItemImpl, ItemStruct, Type, parse_macro_input};

/// Properties given to `#[solution_runner(...)]`, each accepted at most once.
#[derive(Default)]
struct RunnerProperties {
    name: Option<Expr>,
    parsed: Option<Type>,
    part_one: Option<Type>,
    part_two: Option<Type>,
}

/// Store the value of `meta` into `slot`, rejecting a second occurrence of `key`.
fn set_once<T: Parse>(slot: &mut Option<T>, key: &str, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error(format!("duplicate '{key}' property")));
    }
    *slot = Some(meta.value()?.parse()?);
    Ok(())
}

impl RunnerProperties {
    fn parse_property(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        let Some(key) = meta.path.get_ident().map(ToString::to_string) else {
            return Err(meta.error("expected a property name"));
        };
        match key.as_str() {
            "name" => set_once(&mut self.name, &key, meta),
            "parsed" => set_once(&mut self.parsed, &key, meta),
            "part_one" => set_once(&mut self.part_one, &key, meta),
            "part_two" => set_once(&mut self.part_two, &key, meta),
            _ => Err(meta.error(format!("unsupported solution runner property '{key}'"))),
        }
    }

    /// The runner function call matching which properties were given.
    fn solve_call(self) -> syn::Result<proc_macro2::TokenStream> {
        let missing = |key: &str| {
            Error::new(
                Span::call_site(),
                format!("missing required property: '{key}'"),
            )
        };
        let name = self.name.ok_or_else(|| missing("name"))?;
        let part_one = self.part_one.ok_or_else(|| missing("part_one"))?;

        let call = match (self.parsed, self.part_two) {
            (None, None) => quote! {
                advent_framework::runner::solve_half_solution::<#part_one>(
                    #name, input, handler, timed
                )
            },
            (None, Some(part_two)) => quote! {
                advent_framework::runner::solve_full_solution::<#part_one, #part_two>(
                    #name, input, handler, timed
                )
            },
            (Some(parsed), None) => quote! {
                advent_framework::runner::solve_parsed_half_solution::<#parsed, #part_one>(
                    #name, input, handler, timed
                )
            },
            (Some(parsed), Some(part_two)) => quote! {
                advent_framework::runner::solve_parsed_full_solution::<
                    #parsed, #part_one, #part_two
                >(#name, input, handler, timed)
            },
        };
        Ok(call)
    }
}

/// Implement `advent_framework::runner::SolutionRunner` for a struct or the self type of an
/// impl block.
///
/// # Properties
///
/// - `name` (required): expression evaluating to the display title, `&str`.
/// - `part_one` (required): type implementing `Solution<PartOne>`.
/// - `part_two`: type implementing `Solution<PartTwo>`; without it only part one runs.
/// - `parsed`: type implementing `ParseData`; without it solutions receive the raw `str`.
///
/// Unknown or repeated properties, a missing required property, or use on any other item are
/// compile errors.
///
/// ```ignore
/// #[solution_runner(name = "Day 3: Gear Ratios", parsed = Schematic, part_one = Day03, part_two = Day03)]
/// impl super::AdventOfCode2023<3> {}
/// ```
#[proc_macro_attribute]
pub fn solution_runner(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut properties = RunnerProperties::default();
    let property_parser = syn::meta::parser(|meta| properties.parse_property(&meta));
    parse_macro_input!(args with property_parser);

    let solve_call = match properties.solve_call() {
        Ok(call) => call,
        Err(error) => return error.to_compile_error().into(),
    };

    let item = parse_macro_input!(input as Item);
    let self_ty: Type = match &item {
        Item::Struct(ItemStruct { ident, .. }) => syn::parse_quote!(#ident),
        Item::Impl(ItemImpl { self_ty, .. }) => (**self_ty).clone(),
        _ => {
            return Error::new(
                Span::call_site(),
                "#[solution_runner] only applies to a struct or an impl block",
            )
            .to_compile_error()
            .into();
        }
    };

    TokenStream::from(quote! {
        #item

        impl advent_framework::runner::SolutionRunner for #self_ty {
            fn run(
                input: &str,
                handler: &mut dyn advent_framework::runner::OutputHandler,
                timed: bool,
            ) -> advent_framework::DynamicResult<()> {
                #solve_call
            }
        }
    })
}
