//! Schema introspection -> column plan.

use okoshi_core::{
    extract_limit, ColumnMetadata, ColumnPlan, ConfigError, LogicalType, ReferenceTarget,
    Strategy,
};
use okoshi_generator::TableOverrides;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Build the column plan for `table`.
///
/// Auto-increment columns, virtual columns and columns listed in `nulls`
/// are left out entirely. For the rest the first matching strategy wins:
/// registered override, unique, reference, then plain type-based literal.
pub fn build_column_plans(
    table: &str,
    columns: &[ColumnMetadata],
    uniqs: &[String],
    nulls: &[String],
    refs: &BTreeMap<String, ReferenceTarget>,
    overrides: Option<&TableOverrides>,
) -> Result<Vec<ColumnPlan>, ConfigError> {
    let exists = |name: &str| columns.iter().any(|c| c.name == name);

    let configured = uniqs
        .iter()
        .map(|c| (c, "uniqs"))
        .chain(nulls.iter().map(|c| (c, "nulls")))
        .chain(refs.keys().map(|c| (c, "refs")));
    for (column, option) in configured {
        if !exists(column) {
            return Err(ConfigError::UnknownColumn {
                table: table.to_string(),
                column: column.clone(),
                option,
            });
        }
    }

    if let Some(overrides) = overrides {
        for name in overrides.column_names() {
            if !exists(name) {
                warn!("Override for '{}.{}' matches no column", table, name);
            }
        }
    }

    let mut plans = Vec::with_capacity(columns.len());

    for column in columns {
        if column.auto_increment || column.virtual_column || nulls.contains(&column.name) {
            debug!("Skipping column '{}'", column.name);
            continue;
        }

        let logical_type = LogicalType::from_sql_type(&column.sql_type);
        let needs_type = || {
            logical_type.ok_or_else(|| ConfigError::UnsupportedType {
                column: column.name.clone(),
                sql_type: column.sql_type.clone(),
            })
        };

        let strategy = if overrides.is_some_and(|o| o.contains(&column.name)) {
            Strategy::Override
        } else if uniqs.contains(&column.name) {
            Strategy::Unique(needs_type()?)
        } else if let Some(target) = refs.get(&column.name) {
            Strategy::Reference(target.clone())
        } else {
            Strategy::Literal(needs_type()?)
        };

        plans.push(ColumnPlan {
            name: column.name.clone(),
            sql_type: column.sql_type.clone(),
            logical_type,
            limit: extract_limit(&column.sql_type),
            strategy,
        });
    }

    Ok(plans)
}
