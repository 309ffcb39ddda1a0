//! Predicate and ordering builder for post listings.
//!
//! Every client-supplied value ends up as a bound parameter. Column names
//! come only from the `SortColumn` allow-list.

use folio_core::filter::{PostFilter, SortColumn, SortOrder};
use sea_orm::sea_query::{Expr, Func, LikeExpr, Query};
use sea_orm::{ColumnTrait, Condition, EntityTrait, Order, QueryFilter, QueryOrder, Select};

use super::entity::{post, post_author};

const LIKE_ESCAPE: char = '\\';

/// AND of the filters present in `filter`; empty when none are.
pub fn post_condition(filter: &PostFilter) -> Condition {
    Condition::all()
        .add_option(filter.author_id.map(|author_id| {
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_author::Column::PostId)
                    .from(post_author::Entity)
                    .and_where(post_author::Column::AuthorId.eq(author_id))
                    .to_owned(),
            )
        }))
        .add_option(filter.from.map(|from| post::Column::PublishedAt.gte(from)))
        .add_option(filter.to.map(|to| post::Column::PublishedAt.lte(to)))
        .add_option(filter.q.as_deref().map(text_match))
}

/// Case-insensitive substring match on title or summary.
fn text_match(needle: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));

    Condition::any()
        .add(
            Expr::expr(Func::lower(Expr::col((post::Entity, post::Column::Title))))
                .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
        )
        .add(
            Expr::expr(Func::lower(Expr::col((post::Entity, post::Column::Summary))))
                .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
        )
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn sort_column(sort: SortColumn) -> post::Column {
    match sort {
        SortColumn::PublishedAt => post::Column::PublishedAt,
        SortColumn::Title => post::Column::Title,
    }
}

fn sort_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

/// Filtered, ordered post selection. Ties on the sort column fall back to
/// the id in the same direction so pages stay stable.
pub fn filtered_posts(filter: &PostFilter) -> Select<post::Entity> {
    let order = sort_order(filter.order);

    post::Entity::find()
        .filter(post_condition(filter))
        .order_by(sort_column(filter.sort), order.clone())
        .order_by(post::Column::Id, order)
}
