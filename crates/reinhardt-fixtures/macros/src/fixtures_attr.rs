//! Implementation of the `#[fixtures]` attribute

use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::meta::ParseNestedMeta;
use syn::{
	FnArg, GenericArgument, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, PathArguments, Result,
	ReturnType, Type,
};

const CONSTRUCTOR_PREFIX: &str = "new_";

/// Arguments of `#[fixtures(...)]`
#[derive(Default)]
pub struct FixturesArgs {
	entity: Option<Type>,
	getters: Option<Ident>,
}

impl FixturesArgs {
	pub fn parse(&mut self, meta: ParseNestedMeta) -> Result<()> {
		if meta.path.is_ident("entity") {
			self.entity = Some(meta.value()?.parse()?);
			Ok(())
		} else if meta.path.is_ident("getters") {
			self.getters = Some(meta.value()?.parse()?);
			Ok(())
		} else {
			Err(meta.error("unsupported fixtures argument, expected `entity` or `getters`"))
		}
	}
}

/// A `new_` method and what to do with it
enum Candidate<'a> {
	Constructor { method: &'a Ident, key: String },
	Skipped { method: &'a Ident, reason: &'static str },
}

/// Implementation of the `#[fixtures]` attribute macro
///
/// Emits the impl block unchanged followed by a `FixtureHost` impl and,
/// when requested, a getters trait.
pub fn fixtures_impl(args: FixturesArgs, input: ItemImpl) -> Result<TokenStream> {
	let Some(entity) = args.entity else {
		return Err(syn::Error::new(
			Span::call_site(),
			"#[fixtures] requires an `entity = Type` argument",
		));
	};

	if let Some((_, path, _)) = &input.trait_ {
		return Err(syn::Error::new_spanned(
			path,
			"#[fixtures] cannot be applied to trait impls",
		));
	}
	if !input.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(
			&input.generics,
			"#[fixtures] cannot be applied to generic impl blocks",
		));
	}

	let self_ty = &input.self_ty;
	let candidates: Vec<Candidate> = input
		.items
		.iter()
		.filter_map(|item| match item {
			ImplItem::Fn(method) => classify(method, &entity),
			_ => None,
		})
		.collect();

	let registrations = candidates.iter().map(|candidate| match candidate {
		Candidate::Constructor { method, .. } => {
			let name = LitStr::new(&method.to_string(), method.span());
			quote! { registry.constructor(#name, Self::#method)?; }
		}
		Candidate::Skipped { method, reason } => {
			let name = LitStr::new(&method.to_string(), method.span());
			quote! { registry.skip(#name, #reason); }
		}
	});

	let getters = match &args.getters {
		Some(trait_name) => getters_trait(trait_name, self_ty, &entity, &candidates)?,
		None => TokenStream::new(),
	};

	Ok(quote! {
		#input

		impl ::reinhardt_fixtures::FixtureHost for #self_ty {
			type Entity = #entity;

			#[allow(unused_variables)]
			fn register(
				registry: &mut ::reinhardt_fixtures::DispatcherBuilder<Self>,
			) -> ::reinhardt_fixtures::FixtureResult<()> {
				#(#registrations)*
				::core::result::Result::Ok(())
			}
		}

		#getters
	})
}

fn getters_trait(
	trait_name: &Ident,
	self_ty: &Type,
	entity: &Type,
	candidates: &[Candidate],
) -> Result<TokenStream> {
	let mut signatures = Vec::new();
	let mut bodies = Vec::new();

	for candidate in candidates {
		let Candidate::Constructor { method, key } = candidate else {
			continue;
		};
		let getter: Ident = syn::parse_str(key).map_err(|_| {
			syn::Error::new_spanned(
				method,
				format!("fixture key `{key}` is not a valid getter name"),
			)
		})?;
		let doc = format!("Returns the shared `{key}` fixture.");
		let key = LitStr::new(key, method.span());

		signatures.push(quote! {
			#[doc = #doc]
			fn #getter(
				&self,
				opts: ::reinhardt_fixtures::Opts<#entity>,
			) -> ::core::option::Option<::reinhardt_fixtures::FixtureRef<#entity>>;
		});
		bodies.push(quote! {
			fn #getter(
				&self,
				opts: ::reinhardt_fixtures::Opts<#entity>,
			) -> ::core::option::Option<::reinhardt_fixtures::FixtureRef<#entity>> {
				::reinhardt_fixtures::Fixtures::get(self, #key, opts)
			}
		});
	}

	let doc = format!(
		"Typed access to the fixtures of `{}`.",
		self_ty.to_token_stream()
	);

	Ok(quote! {
		#[doc = #doc]
		pub trait #trait_name {
			#(#signatures)*
		}

		impl #trait_name for ::reinhardt_fixtures::Fixtures<#self_ty> {
			#(#bodies)*
		}
	})
}

/// Classifies a method; `None` for methods without the constructor prefix
fn classify<'a>(method: &'a ImplItemFn, entity: &Type) -> Option<Candidate<'a>> {
	let ident = &method.sig.ident;
	let key = ident.to_string().strip_prefix(CONSTRUCTOR_PREFIX)?.to_string();

	let candidate = match check_signature(method, entity, &key) {
		Ok(()) => Candidate::Constructor { method: ident, key },
		Err(reason) => Candidate::Skipped {
			method: ident,
			reason,
		},
	};
	Some(candidate)
}

fn check_signature(
	method: &ImplItemFn,
	entity: &Type,
	key: &str,
) -> std::result::Result<(), &'static str> {
	let sig = &method.sig;

	if key.is_empty() {
		return Err("nothing follows the `new_` prefix");
	}
	if sig.asyncness.is_some() {
		return Err("constructor must not be async");
	}
	if sig.unsafety.is_some() {
		return Err("constructor must not be unsafe");
	}
	if !sig.generics.params.is_empty() {
		return Err("constructor must not be generic");
	}

	let mut inputs = sig.inputs.iter();
	match inputs.next() {
		Some(FnArg::Receiver(receiver))
			if receiver.reference.is_some()
				&& receiver.mutability.is_none()
				&& receiver.colon_token.is_none() => {}
		_ => return Err("receiver must be `&self`"),
	}
	match (inputs.next(), inputs.next()) {
		(Some(FnArg::Typed(param)), None) if is_opts_of(&param.ty, entity) => {}
		_ => return Err("expected exactly one `Opts<Entity>` parameter"),
	}
	match &sig.output {
		ReturnType::Type(_, ty) if same_type(ty, entity) => Ok(()),
		_ => Err("constructor must return the entity type"),
	}
}

/// Matches `Opts<E>` and `Vec<Opt<E>>`, with or without a path prefix
fn is_opts_of(ty: &Type, entity: &Type) -> bool {
	match single_generic(ty) {
		Some(("Opts", inner)) => same_type(inner, entity),
		Some(("Vec", inner)) => matches!(single_generic(inner), Some(("Opt", e)) if same_type(e, entity)),
		_ => false,
	}
}

/// Splits `path::Name<Arg>` into `("Name", Arg)`
fn single_generic(ty: &Type) -> Option<(&'static str, &Type)> {
	let Type::Path(path) = ty else {
		return None;
	};
	let segment = path.path.segments.last()?;
	let PathArguments::AngleBracketed(args) = &segment.arguments else {
		return None;
	};
	if args.args.len() != 1 {
		return None;
	}
	let GenericArgument::Type(inner) = args.args.first()? else {
		return None;
	};

	let name = ["Opts", "Opt", "Vec"]
		.into_iter()
		.find(|name| segment.ident == name)?;
	Some((name, inner))
}

fn same_type(a: &Type, b: &Type) -> bool {
	a.to_token_stream().to_string() == b.to_token_stream().to_string()
}
