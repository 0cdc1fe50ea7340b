use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sql_binder::helpers::create_test_row;
use sql_binder::prelude::*;
use sql_binder::{impl_bindable, impl_bindable_enum};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Role {
    #[default]
    Guest = 0,
    Member = 1,
    Admin = 3,
}

impl_bindable_enum!(Role { Guest, Member, Admin });

#[derive(Debug, Default, Clone, PartialEq)]
struct User {
    name: String,
    active: bool,
    id: i64,
    role: Role,
    balance: Decimal,
    rating: f64,
    joined: NaiveDateTime,
    nickname: Option<String>,
    notes: Vec<String>,
}

impl_bindable!(User {
    name: String,
    active: bool,
    id: i64,
    role: Role,
    balance: Decimal,
    rating: f64,
    joined: NaiveDateTime,
    nickname: Option<String>,
});

fn joined() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 4, 5)
        .and_then(|d| d.and_hms_opt(6, 7, 8))
        .unwrap()
}

#[test]
fn update_scenario_binds_in_property_order() {
    let user = User {
        name: "Ann".into(),
        active: true,
        id: 7,
        ..User::default()
    };
    let params = bind_parameters(
        "update Users set Name=@name, Active=@active where Id=@id",
        &user,
    );
    assert_eq!(
        params.iter().collect::<Vec<_>>(),
        vec![
            ("name", &RowValues::Text("Ann".into())),
            ("active", &RowValues::Bool(true)),
            ("id", &RowValues::Int(7)),
        ]
    );
}

#[test]
fn each_referenced_property_appears_once() {
    let user = User::default();
    let sql = "select * from users where id = @id or (id = @id)\n and name in (@name,@name)";
    let params = bind_parameters(sql, &user);
    assert_eq!(params.names().collect::<Vec<_>>(), vec!["name", "id"]);
}

#[test]
fn placeholder_at_end_of_input_matches() {
    let user = User {
        id: 11,
        ..User::default()
    };
    let params = bind_parameters("delete from users where id = @id", &user);
    assert_eq!(params.get("id"), Some(&RowValues::Int(11)));
}

#[test]
fn unterminated_prefix_does_not_match() {
    let user = User::default();
    let params = bind_parameters("select * from t where x = @identifier and y = @idx;", &user);
    assert!(params.is_empty());
}

#[test]
fn scalar_integer_source() {
    let params = bind_parameters("select * where x=@id", &5_i64);
    assert_eq!(params.len(), 1);
    assert_eq!(params.names().collect::<Vec<_>>(), vec!["id"]);
    assert_eq!(params.get("id"), Some(&RowValues::Int(5)));
}

#[test]
fn scalar_text_source_uses_first_placeholder_only() {
    let params = bind_parameters(
        "select * from t where a = @first and b = @second",
        &String::from("v"),
    );
    assert_eq!(params.names().collect::<Vec<_>>(), vec!["first"]);
}

#[test]
fn minimum_datetime_binds_null() {
    let user = User {
        joined: NaiveDateTime::MIN,
        ..User::default()
    };
    let params = bind_parameters("insert into t (joined) values (@joined)", &user);
    assert_eq!(params.get("joined"), Some(&RowValues::Null));

    let user = User {
        joined: joined(),
        ..User::default()
    };
    let params = bind_parameters("insert into t (joined) values (@joined)", &user);
    assert_eq!(params.get("joined"), Some(&RowValues::Timestamp(joined())));
}

#[test]
fn absent_optional_binds_null() {
    let user = User::default();
    let params = bind_parameters("update t set nickname = @nickname", &user);
    assert_eq!(params.get("nickname"), Some(&RowValues::Null));
}

#[test]
fn enum_binds_ordinal() {
    let user = User {
        role: Role::Admin,
        ..User::default()
    };
    let params = bind_parameters("update t set role = @role", &user);
    assert_eq!(params.get("role"), Some(&RowValues::Enum(3)));
}

#[test]
fn row_to_object_to_parameters_round_trip() {
    let columns = [
        "NAME", "Active", "id", "role", "balance", "rating", "joined", "nickname", "other",
    ];
    let row = create_test_row(
        columns.iter().map(ToString::to_string).collect(),
        vec![
            RowValues::Text("Bo".into()),
            RowValues::Int(1),
            RowValues::Int(42),
            RowValues::Int(1),
            RowValues::Text("19.99".into()),
            RowValues::Float(4.5),
            RowValues::Text("2023-04-05 06:07:08".into()),
            RowValues::Null,
            RowValues::Text("ignored".into()),
        ],
    );
    let mut user = User::default();
    bind_row(&row, &mut user).unwrap();

    let params = bind_parameters(
        "insert into users values (@name, @active, @id, @role, @balance, @rating, @joined, @nickname)",
        &user,
    );
    assert_eq!(
        params.iter().collect::<Vec<_>>(),
        vec![
            ("name", &RowValues::Text("Bo".into())),
            ("active", &RowValues::Bool(true)),
            ("id", &RowValues::Int(42)),
            ("role", &RowValues::Enum(1)),
            ("balance", &RowValues::Decimal(Decimal::new(1999, 2))),
            ("rating", &RowValues::Float(4.5)),
            ("joined", &RowValues::Timestamp(joined())),
            ("nickname", &RowValues::Null),
        ]
    );
    assert!(user.notes.is_empty());
}
