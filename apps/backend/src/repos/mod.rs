//! Repository functions, generic over `ConnectionTrait`, returning `DomainError`.

pub mod categories;
pub mod educations;
pub mod experiences;
pub mod projects;
pub mod skills;
pub mod users;

use std::collections::HashSet;

use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, Select,
};

use crate::http::pagination::{PageMeta, PageParams, Paginated};

const KEY_SEPARATOR: &str = "\u{1f}";

/// Stored form of a natural key. Lowercased here rather than in SQL:
/// SQLite's `lower()` only folds ASCII.
pub(crate) fn lookup_key(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// `key_col = lookup_key(parts)`
pub(crate) fn key_eq<C: ColumnTrait>(col: C, parts: &[&str]) -> SimpleExpr {
    col.eq(lookup_key(parts))
}

/// `key_col LIKE '%term%' ESCAPE '\'`
pub(crate) fn key_contains<C: ColumnTrait>(col: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.trim().to_lowercase()));
    Expr::col(col).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Non-blank search term, if any.
pub(crate) fn search_term(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// First key that appears twice, compared case-insensitively.
pub(crate) fn first_duplicate<I, S>(keys: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    keys.into_iter()
        .find(|k| !seen.insert(k.as_ref().trim().to_lowercase()))
        .map(|k| k.as_ref().to_string())
}

/// Run `select` for one page and count the full result set.
pub(crate) async fn fetch_page<'db, C, E>(
    conn: &'db C,
    select: Select<E>,
    params: &PageParams,
) -> Result<Paginated<E::Model>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync + 'db,
{
    let paginator = select.paginate(conn, params.limit());
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(params.page() - 1).await?;
    Ok(Paginated {
        items,
        pagination: PageMeta::new(params, total),
    })
}
