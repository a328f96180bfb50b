use std::collections::BTreeSet;

use ::entity::{cook, dish, dish_cook, dish_ingredient, dish_type, ingredient, prelude::*};
use sea_orm::*;
use serde::Serialize;
use tracing::info;

use crate::{
    error::{constraint_violation, ServiceError},
    form::{apply_fields, CookCreateForm, CookUpdateForm, DishForm, DishTypeForm, IngredientForm},
    policy::{
        DeletePolicy, COOK_DISH_LINKS, DISH_COOK_LINKS, DISH_INGREDIENT_LINKS, DISH_TYPE_DISHES,
        INGREDIENT_DISH_LINKS,
    },
};

/// Whether a cook is linked to a dish after a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Assignment {
    Assigned,
    Unassigned,
}

fn dish_name_taken(name: &str) -> String {
    format!("Dish with this name ({name}) already exists.")
}

fn username_taken(username: &str) -> String {
    format!("A user with the username {username} already exists.")
}

async fn link_ingredients<C>(db: &C, dish_id: i32, ingredient_ids: BTreeSet<i32>) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if ingredient_ids.is_empty() {
        return Ok(());
    }
    DishIngredient::insert_many(ingredient_ids.into_iter().map(|ingredient_id| {
        dish_ingredient::ActiveModel {
            dish_id: Set(dish_id),
            ingredient_id: Set(ingredient_id),
        }
    }))
    .exec_without_returning(db)
    .await?;

    Ok(())
}

async fn link_cooks<C>(db: &C, dish_id: i32, cook_ids: BTreeSet<i32>) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if cook_ids.is_empty() {
        return Ok(());
    }
    DishCook::insert_many(cook_ids.into_iter().map(|cook_id| dish_cook::ActiveModel {
        dish_id: Set(dish_id),
        cook_id: Set(cook_id),
    }))
    .exec_without_returning(db)
    .await?;

    Ok(())
}

pub struct Mutation;

impl Mutation {
    pub async fn create_dish_type(
        db: &DbConn,
        form_data: DishTypeForm,
    ) -> Result<dish_type::Model, ServiceError> {
        let model = form_data.clean()?;
        let mut active_model = dish_type::ActiveModel::new();
        apply_fields(&mut active_model, &model, DishTypeForm::FIELDS);

        let dish_type = active_model.insert(db).await?;
        info!(dish_type_id = dish_type.id, "dish type created");
        Ok(dish_type)
    }

    pub async fn update_dish_type_by_id(
        db: &DbConn,
        id: i32,
        form_data: DishTypeForm,
    ) -> Result<dish_type::Model, ServiceError> {
        let model = form_data.clean()?;
        let mut dish_type: dish_type::ActiveModel = DishType::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("dish type", id))?
            .into();
        apply_fields(&mut dish_type, &model, DishTypeForm::FIELDS);

        Ok(dish_type.update(db).await?)
    }

    /// Deletes a dish type together with whatever its delete policy says
    /// about the dishes of that type.
    pub async fn delete_dish_type(db: &DbConn, id: i32) -> Result<DeleteResult, ServiceError> {
        let txn = db.begin().await?;
        let dish_type = DishType::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("dish type", id))?;

        if DISH_TYPE_DISHES.policy == DeletePolicy::Cascade {
            let dish_ids: Vec<i32> = Dish::find()
                .select_only()
                .column(dish::Column::Id)
                .filter(dish::Column::DishTypeId.eq(id))
                .into_tuple()
                .all(&txn)
                .await?;
            DISH_INGREDIENT_LINKS.enforce(&txn, &dish_ids).await?;
            DISH_COOK_LINKS.enforce(&txn, &dish_ids).await?;
        }
        let dishes = DISH_TYPE_DISHES.enforce(&txn, &[id]).await?;
        let result = dish_type.delete(&txn).await?;
        txn.commit().await?;

        info!(dish_type_id = id, dishes, "dish type deleted");
        Ok(result)
    }

    pub async fn create_ingredient(
        db: &DbConn,
        form_data: IngredientForm,
    ) -> Result<ingredient::Model, ServiceError> {
        let model = form_data.clean()?;
        let mut active_model = ingredient::ActiveModel::new();
        apply_fields(&mut active_model, &model, IngredientForm::FIELDS);

        let ingredient = active_model.insert(db).await?;
        info!(ingredient_id = ingredient.id, "ingredient created");
        Ok(ingredient)
    }

    pub async fn update_ingredient_by_id(
        db: &DbConn,
        id: i32,
        form_data: IngredientForm,
    ) -> Result<ingredient::Model, ServiceError> {
        let model = form_data.clean()?;
        let mut ingredient: ingredient::ActiveModel = Ingredient::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("ingredient", id))?
            .into();
        apply_fields(&mut ingredient, &model, IngredientForm::FIELDS);

        Ok(ingredient.update(db).await?)
    }

    pub async fn delete_ingredient(db: &DbConn, id: i32) -> Result<DeleteResult, ServiceError> {
        let txn = db.begin().await?;
        let ingredient = Ingredient::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("ingredient", id))?;

        INGREDIENT_DISH_LINKS.enforce(&txn, &[id]).await?;
        let result = ingredient.delete(&txn).await?;
        txn.commit().await?;

        info!(ingredient_id = id, "ingredient deleted");
        Ok(result)
    }

    pub async fn create_cook(
        db: &DbConn,
        form_data: CookCreateForm,
    ) -> Result<cook::Model, ServiceError> {
        let model = form_data.clean()?;
        let mut active_model = cook::ActiveModel::new();
        apply_fields(&mut active_model, &model, CookCreateForm::FIELDS);

        let cook = active_model
            .insert(db)
            .await
            .map_err(|e| constraint_violation(e, "username", username_taken(&model.username)))?;
        info!(cook_id = cook.id, "cook created");
        Ok(cook)
    }

    pub async fn update_cook_by_id(
        db: &DbConn,
        id: i32,
        form_data: CookUpdateForm,
    ) -> Result<cook::Model, ServiceError> {
        let model = form_data.clean()?;
        let mut cook: cook::ActiveModel = Cook::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("cook", id))?
            .into();
        apply_fields(&mut cook, &model, CookUpdateForm::FIELDS);

        cook.update(db)
            .await
            .map_err(|e| constraint_violation(e, "username", username_taken(&model.username)))
    }

    pub async fn delete_cook(db: &DbConn, id: i32) -> Result<DeleteResult, ServiceError> {
        let txn = db.begin().await?;
        let cook = Cook::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("cook", id))?;

        COOK_DISH_LINKS.enforce(&txn, &[id]).await?;
        let result = cook.delete(&txn).await?;
        txn.commit().await?;

        info!(cook_id = id, "cook deleted");
        Ok(result)
    }

    pub async fn create_dish(db: &DbConn, form_data: DishForm) -> Result<dish::Model, ServiceError> {
        let txn = db.begin().await?;
        let model = form_data.clean(&txn).await?;
        let mut active_model = dish::ActiveModel::new();
        apply_fields(&mut active_model, &model, DishForm::FIELDS);

        let dish = active_model
            .insert(&txn)
            .await
            .map_err(|e| constraint_violation(e, "name", dish_name_taken(&model.name)))?;
        link_ingredients(&txn, dish.id, form_data.ingredient_ids()).await?;
        link_cooks(&txn, dish.id, form_data.cook_ids()).await?;
        txn.commit().await?;

        info!(dish_id = dish.id, "dish created");
        Ok(dish)
    }

    /// Updates the dish columns and replaces its ingredient and cook sets.
    pub async fn update_dish_by_id(
        db: &DbConn,
        id: i32,
        form_data: DishForm,
    ) -> Result<dish::Model, ServiceError> {
        let txn = db.begin().await?;
        let mut dish: dish::ActiveModel = Dish::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("dish", id))?
            .into();
        let model = form_data.clean(&txn).await?;
        apply_fields(&mut dish, &model, DishForm::FIELDS);

        let dish = dish
            .update(&txn)
            .await
            .map_err(|e| constraint_violation(e, "name", dish_name_taken(&model.name)))?;
        DishIngredient::delete_many()
            .filter(dish_ingredient::Column::DishId.eq(id))
            .exec(&txn)
            .await?;
        link_ingredients(&txn, id, form_data.ingredient_ids()).await?;
        DishCook::delete_many()
            .filter(dish_cook::Column::DishId.eq(id))
            .exec(&txn)
            .await?;
        link_cooks(&txn, id, form_data.cook_ids()).await?;
        txn.commit().await?;

        info!(dish_id = id, "dish updated");
        Ok(dish)
    }

    pub async fn delete_dish(db: &DbConn, id: i32) -> Result<DeleteResult, ServiceError> {
        let txn = db.begin().await?;
        let dish = Dish::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("dish", id))?;

        DISH_INGREDIENT_LINKS.enforce(&txn, &[id]).await?;
        DISH_COOK_LINKS.enforce(&txn, &[id]).await?;
        let result = dish.delete(&txn).await?;
        txn.commit().await?;

        info!(dish_id = id, "dish deleted");
        Ok(result)
    }

    /// Links the cook to the dish when they are not linked yet, unlinks them
    /// otherwise.
    pub async fn toggle_dish_assignment(
        db: &DbConn,
        dish_id: i32,
        cook_id: i32,
    ) -> Result<Assignment, ServiceError> {
        let txn = db.begin().await?;
        if Dish::find_by_id(dish_id).one(&txn).await?.is_none() {
            return Err(ServiceError::not_found("dish", dish_id));
        }
        if Cook::find_by_id(cook_id).one(&txn).await?.is_none() {
            return Err(ServiceError::not_found("cook", cook_id));
        }

        let linked = DishCook::find_by_id((dish_id, cook_id)).one(&txn).await?;
        let assignment = if linked.is_some() {
            DishCook::delete_many()
                .filter(dish_cook::Column::DishId.eq(dish_id))
                .filter(dish_cook::Column::CookId.eq(cook_id))
                .exec(&txn)
                .await?;
            Assignment::Unassigned
        } else {
            link_cooks(&txn, dish_id, BTreeSet::from([cook_id])).await?;
            Assignment::Assigned
        };
        txn.commit().await?;

        info!(dish_id, cook_id, ?assignment, "dish assignment toggled");
        Ok(assignment)
    }
}
