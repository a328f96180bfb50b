use std::collections::BTreeMap;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use kitchen_api::{router, AppState};
use kitchen_service::{
    form::{CookCreateForm, DishForm, DishTypeForm, IngredientForm},
    sea_orm::{prelude::Decimal, Database, DbConn},
    Mutation, Query,
};
use migration::{Migrator, MigratorTrait};
use tower::ServiceExt;
use tower_cookies::Key;

const PASSWORD: &str = "correct horse";

async fn setup() -> (DbConn, Router) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let state = AppState::new(db.clone(), Key::generate()).unwrap();
    (db, router(state))
}

async fn create_cook(db: &DbConn, username: &str) -> entity::cook::Model {
    Mutation::create_cook(
        db,
        CookCreateForm {
            username: username.to_owned(),
            password1: PASSWORD.to_owned(),
            password2: PASSWORD.to_owned(),
            first_name: "Gordon".to_owned(),
            last_name: "Ramsay".to_owned(),
            years_of_experience: 10,
        },
    )
    .await
    .unwrap()
}

/// Sends requests to the router and keeps the cookies it sets, like a browser.
struct Client {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl Client {
    fn new(app: Router) -> Self {
        Self {
            app,
            cookies: BTreeMap::new(),
        }
    }

    async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> Response<Body> {
        let cookie_header = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        let builder = if cookie_header.is_empty() {
            builder
        } else {
            builder.header(header::COOKIE, cookie_header)
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().unwrap();
            let pair = set_cookie.split(';').next().unwrap();
            let (name, value) = pair.split_once('=').unwrap();
            if set_cookie.contains("Max-Age=0") {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_owned(), value.to_owned());
            }
        }
        response
    }

    async fn get(&mut self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri), Body::empty()).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Response<Body> {
        let builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(builder, Body::from(form.to_owned())).await
    }

    async fn log_in(&mut self, username: &str) {
        let response = self
            .post(
                "/accounts/login",
                &format!("username={username}&password=correct+horse&next=/"),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn lists_require_login() {
    let (db, app) = setup().await;
    create_cook(&db, "gordon").await;
    let mut client = Client::new(app);

    let response = client.get("/dishes/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login?next=/dishes/");

    let response = client.get("/cooks/?username=gor").await;
    assert_eq!(
        location(&response),
        "/accounts/login?next=/cooks/%3Fusername%3Dgor"
    );

    client.log_in("gordon").await;
    let response = client.get("/dishes/").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_follows_next_and_logout_ends_the_session() {
    let (db, app) = setup().await;
    create_cook(&db, "gordon").await;
    let mut client = Client::new(app);

    let response = client
        .post("/accounts/login", "username=gordon&password=wrong&next=/dishes/")
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response)
        .await
        .contains("Please enter a correct username and password."));

    let response = client
        .post(
            "/accounts/login",
            "username=gordon&password=correct+horse&next=/dishes/",
        )
        .await;
    assert_eq!(location(&response), "/dishes/");

    let response = client
        .post(
            "/accounts/login",
            "username=gordon&password=correct+horse&next=//evil.example",
        )
        .await;
    assert_eq!(location(&response), "/");

    let response = client.post("/accounts/logout", "").await;
    assert_eq!(location(&response), "/accounts/login");
    let response = client.get("/dishes/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn index_counts_visits_per_session() {
    let (_db, app) = setup().await;
    let mut client = Client::new(app.clone());

    let first = body_text(client.get("/").await).await;
    assert!(first.contains("visited this page 1 time (previously 0)"));

    let second = body_text(client.get("/").await).await;
    assert!(second.contains("visited this page 2 times (previously 1)"));

    let mut other = Client::new(app);
    let fresh = body_text(other.get("/").await).await;
    assert!(fresh.contains("visited this page 1 time (previously 0)"));
}

#[tokio::test]
async fn toggle_assign_flips_membership_of_the_current_cook() {
    let (db, app) = setup().await;
    let gordon = create_cook(&db, "gordon").await;
    let main = Mutation::create_dish_type(&db, DishTypeForm { name: "Main".to_owned() })
        .await
        .unwrap();
    let dish = Mutation::create_dish(
        &db,
        DishForm {
            name: "Beef Wellington".to_owned(),
            description: "Beef in pastry".to_owned(),
            price: Decimal::new(4200, 2),
            dish_type_id: main.id,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let mut client = Client::new(app);
    client.log_in("gordon").await;

    let uri = format!("/dishes/{}/toggle-assign", dish.id);
    let response = client.post(&uri, "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/dishes/{}", dish.id));
    let detail = Query::find_dish_detail(&db, dish.id).await.unwrap();
    assert!(detail.is_assigned(gordon.id));

    let page = body_text(client.get(&format!("/dishes/{}", dish.id)).await).await;
    assert!(page.contains("Delete me from this dish"));
    assert!(page.contains("You are now assigned to this dish"));

    client.post(&uri, "").await;
    let detail = Query::find_dish_detail(&db, dish.id).await.unwrap();
    assert!(!detail.is_assigned(gordon.id));

    let response = client.post("/dishes/999/toggle-assign", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_cook_is_shown_again_with_errors() {
    let (db, app) = setup().await;
    create_cook(&db, "gordon").await;
    let mut client = Client::new(app);
    client.log_in("gordon").await;

    let response = client
        .post(
            "/cooks/create",
            "username=jamie&password1=pw&password2=pw&first_name=Jamie&last_name=Oliver&years_of_experience=1",
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response)
        .await
        .contains("Years of experience should be greater or equal 2"));
    assert_eq!(Query::count_cooks(&db).await.unwrap(), 1);

    let response = client
        .post(
            "/cooks/create",
            "username=gordon&password1=pw&password2=pw&first_name=G&last_name=R&years_of_experience=3",
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response)
        .await
        .contains("A user with the username gordon already exists."));

    let response = client
        .post(
            "/cooks/create",
            "username=jamie&password1=pw&password2=pw&first_name=Jamie&last_name=Oliver&years_of_experience=2",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cooks/");
    assert_eq!(Query::count_cooks(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn dishes_are_searched_created_and_cascaded() {
    let (db, app) = setup().await;
    create_cook(&db, "gordon").await;
    let mut client = Client::new(app);
    client.log_in("gordon").await;

    let response = client.post("/dish-types/create", "name=Dessert").await;
    assert_eq!(location(&response), "/dish-types/");
    let dessert = Query::find_dish_types_in_page(&db, "dessert", None)
        .await
        .unwrap()
        .items
        .remove(0);
    let mascarpone = Mutation::create_ingredient(
        &db,
        IngredientForm {
            name: "Mascarpone".to_owned(),
            country: "Italy".to_owned(),
        },
    )
    .await
    .unwrap();

    let response = client
        .post(
            "/dishes/create",
            &format!(
                "name=Tiramisu&description=Coffee+and+cream&price=5.50&dish_type={}&ingredients={}",
                dessert.id, mascarpone.id
            ),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dishes/");

    let list = body_text(client.get("/dishes/?ingredient=masc").await).await;
    assert!(list.contains("Tiramisu"));
    assert!(list.contains("Dish successfully added"));
    let list = body_text(client.get("/dishes/?ingredient=basil").await).await;
    assert!(!list.contains("Tiramisu"));

    let response = client
        .post(
            "/dishes/create",
            &format!("name=Tiramisu&description=Again&price=4&dish_type={}", dessert.id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client
        .post(&format!("/dish-types/{}/delete", dessert.id), "")
        .await;
    assert_eq!(location(&response), "/dish-types/");
    let page = Query::find_dishes_in_page(&db, "", None).await.unwrap();
    assert_eq!(page.num_items, 0);
}

#[tokio::test]
async fn missing_records_and_pages_are_not_found() {
    let (db, app) = setup().await;
    create_cook(&db, "gordon").await;
    let mut client = Client::new(app);
    client.log_in("gordon").await;

    assert_eq!(client.get("/dishes/42").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        client.get("/dish-types/42/update").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.post("/ingredients/42/delete", "").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.get("/cooks/?page=7").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(client.get("/cooks/?page=1").await.status(), StatusCode::OK);
    assert_eq!(client.get("/dishes/?page=").await.status(), StatusCode::OK);
    assert_eq!(
        client.get("/dish-types/?name=&page=").await.status(),
        StatusCode::OK
    );
    assert_eq!(
        client.get("/ingredients/?page=abc").await.status(),
        StatusCode::NOT_FOUND
    );
}
