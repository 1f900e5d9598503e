use knuffel::errors::DecodeError;

/// Where thumbnails and overlay images are fetched from.
#[derive(knuffel::Decode, Debug, Clone, PartialEq, Eq)]
pub struct ImageService {
    /// Image URL with `{id}`, `{width}` and `{height}` placeholders.
    #[knuffel(child, unwrap(argument), default = Self::default().url_template)]
    pub url_template: UrlTemplate,
    /// Link to the photo's origin page with a `{ref}` placeholder.
    #[knuffel(child, unwrap(argument), default = Self::default().external_url_template)]
    pub external_url_template: String,
}

impl Default for ImageService {
    fn default() -> Self {
        Self {
            url_template: UrlTemplate(String::from(
                "https://picsum.photos/id/{id}/{width}/{height}",
            )),
            external_url_template: String::from("https://unsplash.com/photos/{ref}"),
        }
    }
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    #[knuffel(child, unwrap(argument), default = Self::default().resize_ms)]
    pub resize_ms: u64,
}

impl Default for Debounce {
    fn default() -> Self {
        Self { resize_ms: 100 }
    }
}

/// Image URL template.
///
/// Must mention every placeholder, otherwise different sizes of the same photo would map to
/// the same URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(pub String);

impl UrlTemplate {
    pub const PLACEHOLDERS: [&'static str; 3] = ["{id}", "{width}", "{height}"];
}

impl<S: knuffel::traits::ErrorSpan> knuffel::DecodeScalar<S> for UrlTemplate {
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        if let Some(type_name) = &type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<UrlTemplate, DecodeError<S>> {
        match &**val {
            knuffel::ast::Literal::String(ref s) => {
                let missing: Vec<_> = Self::PLACEHOLDERS
                    .into_iter()
                    .filter(|p| !s.contains(p))
                    .collect();

                if !missing.is_empty() {
                    ctx.emit_error(DecodeError::conversion(
                        val,
                        format!("url template is missing {}", missing.join(", ")),
                    ));
                }

                Ok(Self(s.to_string()))
            }
            _ => {
                ctx.emit_error(DecodeError::unsupported(
                    val,
                    "url templates must be strings",
                ));
                Ok(Self(String::new()))
            }
        }
    }
}
