//! End-to-end compilation scenarios covering each dialect, bracket grouping,
//! JSON operators, CTEs, unions, subqueries, and structural-failure cases —
//! each asserting the exact rendered SQL and binding vector.

use fluentsql::{Delete, Direction, Insert, Select, Update};

#[test]
fn s1_select_with_where_and_and() {
    let mut select = Select::new();
    select
        .select("*")
        .from("users", None)
        .where_("status")
        .equals("active")
        .and("age")
        .greater(27);

    let prepared = select.to_sql("mysql", true, None).unwrap();
    assert_eq!(prepared.sql, "SELECT * FROM `users` WHERE status = ? AND age > ?");
    assert_eq!(
        prepared.bindings,
        vec![fluentsql::Value::from("active"), fluentsql::Value::from(27i64)]
    );
}

#[test]
fn s2_delete_raw_postgres() {
    let mut delete = Delete::new();
    delete.from("users", None).where_("id").equals(1i64);

    let sql = delete.to_sql("postgres", false, None).unwrap().sql;
    assert_eq!(sql, "DELETE FROM \"users\" WHERE id = 1");
}

#[test]
fn s3_delete_suppresses_order_by_and_limit_for_sqlite() {
    let mut delete = Delete::new();
    delete
        .from("logs", None)
        .where_("level")
        .equals("info")
        .order_by("created_at", Direction::Desc)
        .limit(1000);

    let sql = delete.to_sql("sqlite", false, None).unwrap().sql;
    assert_eq!(sql, "DELETE FROM `logs` WHERE level = 'info'");
}

#[test]
fn s4_json_extract_for_postgres() {
    let mut select = Select::new();
    select
        .select("*")
        .from("users", None)
        .where_json("metadata")
        .extract("$.user.name")
        .equals("John");

    let sql = select.to_sql("postgres", false, None).unwrap().sql;
    assert_eq!(
        sql,
        "SELECT * FROM \"users\" WHERE \"metadata\"->'user'->>'name' = 'John'"
    );
}

#[test]
fn s5_json_contains_for_sqlite_prepared() {
    let mut select = Select::new();
    select
        .select("*")
        .from("users", None)
        .where_json("preferences")
        .contains("dark_mode", None);

    let prepared = select.to_sql("sqlite", true, None).unwrap();
    assert_eq!(prepared.sql, "SELECT * FROM `users` WHERE `preferences` LIKE '%' || ? || '%'");
    assert_eq!(prepared.bindings, vec![fluentsql::Value::from("dark_mode")]);
}

#[test]
fn s6_unbalanced_open_bracket_fails_to_compile() {
    let mut delete = Delete::new();
    delete.from("users", None).where_bracket("status", "(").equals("active");

    let result = delete.to_sql("mysql", false, None);
    assert!(result.is_err());
}

#[test]
fn s6_balanced_bracket_group_compiles() {
    let mut delete = Delete::new();
    delete
        .from("users", None)
        .where_bracket("status", "(")
        .closing(")")
        .equals("active");

    let sql = delete.to_sql("mysql", false, None).unwrap().sql;
    assert_eq!(sql, "DELETE FROM `users` WHERE (status = 'active')");
}

#[test]
fn s7_recursive_cte_orders_bindings_cte_then_main() {
    let mut employees_under_manager = Select::new();
    employees_under_manager
        .select("id")
        .from("employees", None)
        .where_("manager_id")
        .equals(1i64);

    let mut select = Select::new();
    select
        .with_recursive("emp", employees_under_manager)
        .select("*")
        .from("departments", None)
        .where_("id")
        .equals(100i64);

    let prepared = select.to_sql("mysql", true, None).unwrap();
    assert!(prepared.sql.starts_with("WITH RECURSIVE `emp` AS (SELECT id FROM `employees` WHERE manager_id = ?)"));
    assert_eq!(
        prepared.bindings,
        vec![fluentsql::Value::from(1i64), fluentsql::Value::from(100i64)]
    );
}

#[test]
fn union_all_branch_bindings_append_after_main() {
    let mut suppliers = Select::new();
    suppliers
        .select("*")
        .from("suppliers", None)
        .where_("country")
        .equals("AT");

    let mut employees = Select::new();
    employees
        .select("*")
        .from("employees", None)
        .where_("country")
        .equals("CH")
        .union_all(suppliers);

    let prepared = employees.to_sql("mysql", true, None).unwrap();
    assert_eq!(
        prepared.bindings,
        vec![fluentsql::Value::from("CH"), fluentsql::Value::from("AT")]
    );
}

#[test]
fn s8_insert_cannot_set_both_do_update_and_do_nothing() {
    let mut insert = Insert::new();
    insert
        .into("users")
        .fields(vec!["id", "email"])
        .values(vec![fluentsql::Value::Int(1), fluentsql::Value::from("a@example.com")])
        .on_conflict(vec!["id"])
        .do_update("email", "a@example.com")
        .do_nothing();

    let result = insert.to_sql("postgres", true, None);
    assert!(result.is_err());
}

#[test]
fn s9_limit_zero_offset_zero_emits_limit_but_no_offset() {
    let mut select = Select::new();
    select.select("*").from("users", None).limit(0, Some(0));

    let sql = select.to_sql("mysql", false, None).unwrap().sql;
    assert_eq!(sql, "SELECT * FROM `users` LIMIT 0");
}

#[test]
fn update_suppresses_join_order_by_limit_for_postgres() {
    let mut update = Update::new();
    update
        .table("accounts", None)
        .set("balance", 0i64)
        .inner_join("ledgers", None, "ledgers.account_id = accounts.id")
        .order_by("id", Direction::Asc)
        .limit(5)
        .where_("id")
        .equals(1i64);

    let sql = update.to_sql("postgres", false, None).unwrap().sql;
    assert_eq!(sql, "UPDATE \"accounts\" SET balance = 0 WHERE id = 1");
}

#[test]
fn subquery_in_splices_bindings_and_removes_subquery_from_main_vector() {
    let mut active_ids = Select::new();
    active_ids
        .select("id")
        .from("sessions", None)
        .where_("active")
        .equals(true)
        .and("region")
        .equals("eu");

    let mut select = Select::new();
    select
        .select("*")
        .from("users", None)
        .where_("id")
        .in_subquery(active_ids.into_subquery());

    let prepared = select.to_sql("mysql", true, None).unwrap();
    assert_eq!(
        prepared.sql,
        "SELECT * FROM `users` WHERE id IN ((SELECT id FROM `sessions` WHERE active = ? AND region = ?))"
    );
    assert_eq!(
        prepared.bindings,
        vec![fluentsql::Value::from(true), fluentsql::Value::from("eu")]
    );
}

#[test]
fn exists_condition_compiles_with_correlated_subquery() {
    let mut orders = Select::new();
    orders
        .select("1")
        .from("orders", None)
        .where_("orders.user_id")
        .equals(fluentsql::Expression::new("users.id").unwrap());

    let mut select = Select::new();
    select.select("*").from("users", None).exists(orders.into_subquery());

    let sql = select.to_sql("mysql", false, None).unwrap().sql;
    assert_eq!(
        sql,
        "SELECT * FROM `users` WHERE EXISTS (SELECT 1 FROM `orders` WHERE orders.user_id = users.id)"
    );
}

#[test]
fn mariadb_renders_identically_to_mysql() {
    let mut select = Select::new();
    select.select("*").from("users", None).where_("id").equals(1i64);

    let mysql_sql = select.to_sql("mysql", false, None).unwrap().sql;
    let mariadb_sql = select.to_sql("mariadb", false, None).unwrap().sql;
    assert_eq!(mysql_sql, mariadb_sql);
}

#[test]
fn insert_values_arity_mismatch_is_a_caller_error() {
    let mut insert = Insert::new();
    insert
        .into("users")
        .fields(vec!["id", "email"])
        .values(vec![fluentsql::Value::Int(1)]);

    let result = insert.to_sql("mysql", true, None);
    assert!(result.is_err());
}

#[test]
fn update_without_table_is_a_caller_error() {
    let mut update = Update::new();
    update.set("balance", 0i64);

    let result = update.to_sql("mysql", true, None);
    assert!(result.is_err());
}

#[test]
fn delete_without_table_is_a_caller_error() {
    let delete = Delete::new();
    let result = delete.to_sql("mysql", true, None);
    assert!(result.is_err());
}

#[test]
fn injection_attempt_in_raw_mode_is_rejected() {
    let mut select = Select::new();
    select.select("*").from("users", None).where_("name").equals("admin'-- ");

    let result = select.to_sql("mysql", false, None);
    assert!(result.is_err());
}
