use ::entity::{cook, dish, dish_ingredient, dish_type, ingredient, prelude::*};
use sea_orm::{
    sea_query::{Expr, Func, IntoIden, LikeExpr, Query as SelectQuery, SimpleExpr},
    *,
};
use serde::Serialize;

use crate::error::ServiceError;

/// Every list view shows this many rows per page.
pub const PAGE_SIZE: u64 = 5;

/// One page of a list, numbered from 1.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub num_items: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    fn new(items: Vec<T>, number: u64, num_items: u64) -> Self {
        let num_pages = num_items.div_ceil(PAGE_SIZE).max(1);
        Self {
            items,
            number,
            num_pages,
            num_items,
            has_previous: number > 1,
            has_next: number < num_pages,
        }
    }

    fn map<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            num_items: self.num_items,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

/// A dish as listed, with its type and ingredients resolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DishRow {
    pub dish: dish::Model,
    pub dish_type: Option<dish_type::Model>,
    pub ingredients: Vec<ingredient::Model>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DishDetail {
    pub dish: dish::Model,
    pub label: String,
    pub dish_type: dish_type::Model,
    pub ingredients: Vec<ingredient::Model>,
    pub cooks: Vec<cook::Model>,
}

impl DishDetail {
    pub fn is_assigned(&self, cook_id: i32) -> bool {
        self.cooks.iter().any(|cook| cook.id == cook_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CookDish {
    pub dish: dish::Model,
    pub dish_type: Option<dish_type::Model>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CookDetail {
    pub cook: cook::Model,
    pub display_name: String,
    pub dishes: Vec<CookDish>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KitchenCounts {
    pub num_dishes: u64,
    pub num_dish_types: u64,
    pub num_cooks: u64,
    pub num_ingredients: u64,
}

/// Everything a dish form offers to pick from.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DishChoices {
    pub dish_types: Vec<dish_type::Model>,
    pub ingredients: Vec<ingredient::Model>,
    pub cooks: Vec<cook::Model>,
}

/// Case-insensitive substring match of `needle` against `table.column`.
/// `%` and `_` in the needle match literally.
///
/// SQLite's `LOWER` folds ASCII only, so the needle is also matched as typed:
/// there a non-ASCII letter matches only in the case it is stored in.
fn icontains<T, C>(table: T, column: C, needle: &str) -> SimpleExpr
where
    T: IntoIden + Copy + 'static,
    C: IntoIden + Copy + 'static,
{
    let folded = format!("%{}%", escape_like(&needle.to_lowercase()));
    let as_typed = format!("%{}%", escape_like(needle));

    Expr::expr(Func::lower(Expr::col((table, column))))
        .like(LikeExpr::new(folded).escape('\\'))
        .or(Expr::col((table, column)).like(LikeExpr::new(as_typed).escape('\\')))
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

async fn fetch_page<E>(
    db: &DbConn,
    select: Select<E>,
    page: Option<u64>,
) -> Result<Page<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
{
    let number = page.unwrap_or(1).max(1);
    let paginator = select.paginate(db, PAGE_SIZE);
    let num_items = paginator.num_items().await?;
    let page: Page<E::Model> = Page::new(Vec::new(), number, num_items);
    if number > page.num_pages {
        return Err(ServiceError::PageOutOfRange(number));
    }

    let items = paginator.fetch_page(number - 1).await?;
    Ok(page.map(items))
}

pub struct Query;

impl Query {
    pub async fn count_all(db: &DbConn) -> Result<KitchenCounts, DbErr> {
        Ok(KitchenCounts {
            num_dishes: Dish::find().count(db).await?,
            num_dish_types: DishType::find().count(db).await?,
            num_cooks: Cook::find().count(db).await?,
            num_ingredients: Ingredient::find().count(db).await?,
        })
    }

    pub async fn find_dish_type_by_id(db: &DbConn, id: i32) -> Result<dish_type::Model, ServiceError> {
        DishType::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("dish type", id))
    }

    /// Dish types whose name contains `name`, ordered by name.
    pub async fn find_dish_types_in_page(
        db: &DbConn,
        name: &str,
        page: Option<u64>,
    ) -> Result<Page<dish_type::Model>, ServiceError> {
        let mut select = DishType::find()
            .order_by_asc(dish_type::Column::Name)
            .order_by_asc(dish_type::Column::Id);
        let name = name.trim();
        if !name.is_empty() {
            select = select.filter(icontains(DishType, dish_type::Column::Name, name));
        }

        fetch_page(db, select, page).await
    }

    pub async fn find_ingredient_by_id(
        db: &DbConn,
        id: i32,
    ) -> Result<ingredient::Model, ServiceError> {
        Ingredient::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("ingredient", id))
    }

    pub async fn find_ingredients_in_page(
        db: &DbConn,
        page: Option<u64>,
    ) -> Result<Page<ingredient::Model>, ServiceError> {
        let select = Ingredient::find().order_by_asc(ingredient::Column::Id);

        fetch_page(db, select, page).await
    }

    pub async fn find_cook_by_id(db: &DbConn, id: i32) -> Result<cook::Model, ServiceError> {
        Cook::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("cook", id))
    }

    pub async fn find_cook_by_username(
        db: &DbConn,
        username: &str,
    ) -> Result<Option<cook::Model>, DbErr> {
        Cook::find()
            .filter(cook::Column::Username.eq(username))
            .one(db)
            .await
    }

    /// Cooks whose username contains `username`, ordered by username.
    pub async fn find_cooks_in_page(
        db: &DbConn,
        username: &str,
        page: Option<u64>,
    ) -> Result<Page<cook::Model>, ServiceError> {
        let mut select = Cook::find().order_by_asc(cook::Column::Username);
        let username = username.trim();
        if !username.is_empty() {
            select = select.filter(icontains(Cook, cook::Column::Username, username));
        }

        fetch_page(db, select, page).await
    }

    /// A cook with the dishes they prepare and each dish's type.
    pub async fn find_cook_detail(db: &DbConn, id: i32) -> Result<CookDetail, ServiceError> {
        let cook = Self::find_cook_by_id(db, id).await?;
        let dishes = cook
            .find_related(Dish)
            .find_also_related(DishType)
            .order_by_asc(dish::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(|(dish, dish_type)| CookDish { dish, dish_type })
            .collect();

        Ok(CookDetail {
            display_name: cook.to_string(),
            cook,
            dishes,
        })
    }

    pub async fn count_cooks(db: &DbConn) -> Result<u64, DbErr> {
        Cook::find().count(db).await
    }

    pub async fn find_dish_by_id(db: &DbConn, id: i32) -> Result<dish::Model, ServiceError> {
        Dish::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("dish", id))
    }

    /// Dishes using at least one ingredient whose name contains `ingredient`;
    /// a blank filter lists every dish.
    pub async fn find_dishes_in_page(
        db: &DbConn,
        ingredient: &str,
        page: Option<u64>,
    ) -> Result<Page<DishRow>, ServiceError> {
        let mut select = Dish::find().order_by_asc(dish::Column::Id);
        let ingredient = ingredient.trim();
        if !ingredient.is_empty() {
            let matching = SelectQuery::select()
                .column(dish_ingredient::Column::DishId)
                .from(DishIngredient)
                .inner_join(
                    Ingredient,
                    Expr::col((Ingredient, ingredient::Column::Id))
                        .equals((DishIngredient, dish_ingredient::Column::IngredientId)),
                )
                .and_where(icontains(Ingredient, ingredient::Column::Name, ingredient))
                .to_owned();
            select = select.filter(dish::Column::Id.in_subquery(matching));
        }

        let page = fetch_page(db, select, page).await?;
        let dish_types = page.items.load_one(DishType, db).await?;
        let ingredients = page
            .items
            .load_many_to_many(Ingredient, DishIngredient, db)
            .await?;

        let rows = page
            .items
            .iter()
            .cloned()
            .zip(dish_types)
            .zip(ingredients)
            .map(|((dish, dish_type), ingredients)| DishRow {
                dish,
                dish_type,
                ingredients,
            })
            .collect();

        Ok(page.map(rows))
    }

    /// A dish with its type, ingredients and cooks.
    pub async fn find_dish_detail(db: &DbConn, id: i32) -> Result<DishDetail, ServiceError> {
        let dish = Self::find_dish_by_id(db, id).await?;
        let dish_type = dish
            .find_related(DishType)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("dish type", dish.dish_type_id))?;
        let ingredients = dish
            .find_related(Ingredient)
            .order_by_asc(ingredient::Column::Name)
            .all(db)
            .await?;
        let cooks = dish
            .find_related(Cook)
            .order_by_asc(cook::Column::Username)
            .all(db)
            .await?;

        Ok(DishDetail {
            label: dish.label(&dish_type),
            dish,
            dish_type,
            ingredients,
            cooks,
        })
    }

    pub async fn find_dish_choices(db: &DbConn) -> Result<DishChoices, DbErr> {
        Ok(DishChoices {
            dish_types: DishType::find()
                .order_by_asc(dish_type::Column::Name)
                .all(db)
                .await?,
            ingredients: Ingredient::find()
                .order_by_asc(ingredient::Column::Name)
                .all(db)
                .await?,
            cooks: Cook::find()
                .order_by_asc(cook::Column::Username)
                .all(db)
                .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("mascarpone"), "mascarpone");
        assert_eq!(escape_like("100%_pure\\"), "100\\%\\_pure\\\\");
    }

    #[test]
    fn pages_know_their_neighbours() {
        let first: Page<()> = Page::new(Vec::new(), 1, 11);
        assert_eq!(first.num_pages, 3);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let last: Page<()> = Page::new(Vec::new(), 3, 11);
        assert!(last.has_previous);
        assert!(!last.has_next);

        let empty: Page<()> = Page::new(Vec::new(), 1, 0);
        assert_eq!(empty.num_pages, 1);
        assert!(!empty.has_next);
    }
}
