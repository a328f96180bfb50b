mod common;

use common::*;
use entity::dish_type;
use kitchen_service::{
    form::{CookUpdateForm, DishTypeForm, IngredientForm},
    Auth, Mutation, Query, ServiceError,
};

#[tokio::test]
async fn dish_type_crud() {
    let db = &setup().await;

    {
        let dessert = dish_type(db, "Dessert").await;
        assert_eq!(
            dessert,
            dish_type::Model {
                id: 1,
                name: "Dessert".to_owned(),
            }
        );
    }

    {
        let soup = Mutation::update_dish_type_by_id(
            db,
            1,
            DishTypeForm {
                name: "  Soup ".to_owned(),
            },
        )
        .await
        .unwrap();

        assert_eq!(soup.id, 1);
        assert_eq!(soup.name, "Soup");
        assert_eq!(Query::find_dish_type_by_id(db, 1).await.unwrap(), soup);
    }

    {
        let err = Mutation::create_dish_type(db, DishTypeForm::default())
            .await
            .unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.contains("name"));
    }

    {
        let err = Mutation::update_dish_type_by_id(
            db,
            42,
            DishTypeForm {
                name: "Starter".to_owned(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 42, .. }));
    }

    {
        let result = Mutation::delete_dish_type(db, 1).await.unwrap();
        assert_eq!(result.rows_affected, 1);

        let err = Query::find_dish_type_by_id(db, 1).await.unwrap_err();
        assert!(err.is_not_found());

        let err = Mutation::delete_dish_type(db, 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}

#[tokio::test]
async fn ingredient_crud() {
    let db = &setup().await;

    let mascarpone = ingredient(db, "Mascarpone", "Italy").await;
    assert_eq!(mascarpone.to_string(), "Mascarpone(made in Italy)");

    let updated = Mutation::update_ingredient_by_id(
        db,
        mascarpone.id,
        IngredientForm {
            name: "Mascarpone".to_owned(),
            country: "Lombardy".to_owned(),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.country, "Lombardy");

    let err = Mutation::create_ingredient(
        db,
        IngredientForm {
            name: "Salt".to_owned(),
            country: " ".to_owned(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.field_errors().unwrap().contains("country"));

    let page = Query::find_ingredients_in_page(db, None).await.unwrap();
    assert_eq!(page.num_items, 1);

    Mutation::delete_ingredient(db, mascarpone.id).await.unwrap();
    assert!(Query::find_ingredient_by_id(db, mascarpone.id)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn cook_years_of_experience_must_be_at_least_two() {
    let db = &setup().await;

    for years in [0, 1] {
        let err = Mutation::create_cook(db, cook_form(&format!("junior{years}"), years))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert!(errors.contains("years_of_experience")),
            other => panic!("unexpected error {other:?}"),
        }
    }
    assert_eq!(Query::count_cooks(db).await.unwrap(), 0);

    for years in [2, 3, 40] {
        let cook = Mutation::create_cook(db, cook_form(&format!("senior{years}"), years))
            .await
            .unwrap();
        assert_eq!(cook.years_of_experience, years);
    }
    assert_eq!(Query::count_cooks(db).await.unwrap(), 3);
}

#[tokio::test]
async fn cook_usernames_are_unique() {
    let db = &setup().await;
    let gordon = cook(db, "gordon").await;
    assert_eq!(gordon.to_string(), "gordon (Gordon Ramsay)");

    let err = Mutation::create_cook(db, cook_form("gordon", 10))
        .await
        .unwrap_err();
    match err {
        ServiceError::Integrity { field, .. } => assert_eq!(field, Some("username")),
        other => panic!("unexpected error {other:?}"),
    }

    let jamie = cook(db, "jamie").await;
    let err = Mutation::update_cook_by_id(
        db,
        jamie.id,
        CookUpdateForm {
            username: "gordon".to_owned(),
            first_name: "Jamie".to_owned(),
            last_name: "Oliver".to_owned(),
            years_of_experience: 20,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Integrity { .. }));
}

#[tokio::test]
async fn cook_update_keeps_the_password() {
    let db = &setup().await;
    let gordon = cook(db, "gordon").await;

    let updated = Mutation::update_cook_by_id(
        db,
        gordon.id,
        CookUpdateForm {
            username: "chef_gordon".to_owned(),
            first_name: "Gordon".to_owned(),
            last_name: "Ramsay".to_owned(),
            years_of_experience: 30,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.password, gordon.password);
    assert_eq!(updated.years_of_experience, 30);

    let err = Mutation::update_cook_by_id(
        db,
        gordon.id,
        CookUpdateForm {
            years_of_experience: 1,
            ..CookUpdateForm::from(&updated)
        },
    )
    .await
    .unwrap_err();
    assert!(err.field_errors().unwrap().contains("years_of_experience"));

    let authenticated = Auth::authenticate(db, "chef_gordon", "correct horse")
        .await
        .unwrap();
    assert_eq!(authenticated.map(|c| c.id), Some(gordon.id));
    assert!(Auth::authenticate(db, "chef_gordon", "wrong")
        .await
        .unwrap()
        .is_none());
    assert!(Auth::authenticate(db, "nobody", "correct horse")
        .await
        .unwrap()
        .is_none());

    Mutation::delete_cook(db, gordon.id).await.unwrap();
    assert_eq!(Query::count_cooks(db).await.unwrap(), 0);
}
