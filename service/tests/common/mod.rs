#![allow(dead_code)]

use entity::{cook, dish, dish_type, ingredient};
use kitchen_service::{
    form::{CookCreateForm, DishForm, DishTypeForm, IngredientForm},
    sea_orm::{prelude::Decimal, Database, DbConn},
    Mutation,
};
use migration::{Migrator, MigratorTrait};

pub async fn setup() -> DbConn {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn dish_type(db: &DbConn, name: &str) -> dish_type::Model {
    Mutation::create_dish_type(
        db,
        DishTypeForm {
            name: name.to_owned(),
        },
    )
    .await
    .unwrap()
}

pub async fn ingredient(db: &DbConn, name: &str, country: &str) -> ingredient::Model {
    Mutation::create_ingredient(
        db,
        IngredientForm {
            name: name.to_owned(),
            country: country.to_owned(),
        },
    )
    .await
    .unwrap()
}

pub fn cook_form(username: &str, years_of_experience: i32) -> CookCreateForm {
    CookCreateForm {
        username: username.to_owned(),
        password1: "correct horse".to_owned(),
        password2: "correct horse".to_owned(),
        first_name: "Gordon".to_owned(),
        last_name: "Ramsay".to_owned(),
        years_of_experience,
    }
}

pub async fn cook(db: &DbConn, username: &str) -> cook::Model {
    Mutation::create_cook(db, cook_form(username, 5)).await.unwrap()
}

pub fn dish_form(name: &str, price: Decimal, dish_type_id: i32) -> DishForm {
    DishForm {
        name: name.to_owned(),
        description: format!("{name}, made fresh"),
        price,
        dish_type_id,
        ingredient_ids: Vec::new(),
        cook_ids: Vec::new(),
    }
}

pub async fn dish(db: &DbConn, name: &str, dish_type_id: i32) -> dish::Model {
    Mutation::create_dish(db, dish_form(name, Decimal::new(1000, 2), dish_type_id))
        .await
        .unwrap()
}
