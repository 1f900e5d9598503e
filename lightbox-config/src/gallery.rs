use knuffel::errors::DecodeError;

/// Thumbnail grid settings.
#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Gallery {
    #[knuffel(child, unwrap(argument), default = Self::default().gutter)]
    pub gutter: u32,
    #[knuffel(child, unwrap(argument), default = Self::default().max_thumbnail_width)]
    pub max_thumbnail_width: u32,
    #[knuffel(child, default)]
    pub responsive_columns: ResponsiveColumns,
    #[knuffel(child, unwrap(argument), default = Self::default().min_viewport_width)]
    pub min_viewport_width: u32,
    #[knuffel(child, unwrap(argument), default = Self::default().max_viewport_width)]
    pub max_viewport_width: u32,
    #[knuffel(child, unwrap(argument), default = Self::default().max_columns)]
    pub max_columns: u32,
    #[knuffel(child, unwrap(argument), default = Self::default().rows_per_page)]
    pub rows_per_page: u32,
    #[knuffel(child)]
    pub disable_pagination: bool,
    #[knuffel(child, unwrap(argument), default)]
    pub download_limit: usize,
    #[knuffel(child, unwrap(argument), default = Self::default().scroll_epsilon)]
    pub scroll_epsilon: u32,
}

impl Default for Gallery {
    fn default() -> Self {
        Self {
            gutter: 8,
            max_thumbnail_width: 192,
            responsive_columns: ResponsiveColumns::default(),
            min_viewport_width: 300,
            max_viewport_width: 2100,
            max_columns: 12,
            rows_per_page: 2,
            disable_pagination: false,
            download_limit: 0,
            scroll_epsilon: 1,
        }
    }
}

/// Column count per 100px band of viewport width.
///
/// The table must be non-empty and non-decreasing, otherwise growing the window could remove
/// columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsiveColumns(pub Vec<u32>);

impl Default for ResponsiveColumns {
    fn default() -> Self {
        Self(vec![
            0, 0, 2, 2, 2, 2, 3, 3, 4, 4, 5, 5, 5, 5, 6, 6, 7, 7, 8, 8, 9,
        ])
    }
}

impl<S: knuffel::traits::ErrorSpan> knuffel::Decode<S> for ResponsiveColumns {
    fn decode_node(
        node: &knuffel::ast::SpannedNode<S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        for child in node.children() {
            ctx.emit_error(DecodeError::unexpected(
                child,
                "node",
                "`responsive-columns` takes no children",
            ));
        }

        for name in node.properties.keys() {
            ctx.emit_error(DecodeError::unexpected(
                name,
                "property",
                format!("unexpected property `{}`", name.escape_default()),
            ));
        }

        let mut bands = Vec::with_capacity(node.arguments.len());
        for value in &node.arguments {
            let count = <u32 as knuffel::traits::DecodeScalar<S>>::decode(value, ctx)?;

            if let Some(&prev) = bands.last() {
                if count < prev {
                    ctx.emit_error(DecodeError::conversion(
                        &value.literal,
                        format!("column count {count} is smaller than the previous band ({prev})"),
                    ));
                }
            }

            bands.push(count);
        }

        if bands.is_empty() {
            return Err(DecodeError::missing(
                node,
                "`responsive-columns` needs at least one column count",
            ));
        }

        Ok(Self(bands))
    }
}
