// tests for the read-only sql guard

use dbchat::{Guard, Verdict};

#[test]
fn test_allows_select() {
    assert_eq!(Guard::check("SELECT id, name FROM users"), Verdict::Allowed);
}

#[test]
fn test_allows_select_with_where_and_join() {
    let sql = "SELECT u.name, o.amount FROM users u JOIN orders o ON u.id = o.user_id WHERE o.amount > 10";
    assert_eq!(Guard::check(sql), Verdict::Allowed);
}

#[test]
fn test_allows_lowercase_select() {
    assert_eq!(Guard::check("select count(*) from orders"), Verdict::Allowed);
}

#[test]
fn test_denies_every_forbidden_keyword() {
    let statements = [
        ("INSERT INTO users (name) VALUES ('x')", "INSERT"),
        ("UPDATE users SET name = 'x' WHERE id = 1", "UPDATE"),
        ("DELETE FROM users WHERE id = 1", "DELETE"),
        ("ALTER TABLE users ADD COLUMN age INT", "ALTER"),
        ("DROP TABLE users", "DROP"),
        ("CREATE TABLE t (id INT)", "CREATE"),
        ("REPLACE INTO users VALUES (1, 'x')", "REPLACE"),
        ("TRUNCATE TABLE users", "TRUNCATE"),
        ("GRANT ALL ON users TO bob", "GRANT"),
        ("REVOKE ALL ON users FROM bob", "REVOKE"),
    ];

    for (sql, keyword) in statements {
        assert_eq!(Guard::check(sql), Verdict::Denied { keyword }, "{sql}");
    }
}

#[test]
fn test_denies_lowercase() {
    assert_eq!(
        Guard::check("delete from users"),
        Verdict::Denied { keyword: "DELETE" }
    );
}

#[test]
fn test_denies_mixed_case() {
    assert_eq!(
        Guard::check("DrOp TaBlE users"),
        Verdict::Denied { keyword: "DROP" }
    );
}

#[test]
fn test_denies_keyword_mid_statement() {
    // not just a leading token
    assert_eq!(
        Guard::check("SELECT * FROM users; DROP TABLE users"),
        Verdict::Denied { keyword: "DROP" }
    );
}

#[test]
fn test_denies_keyword_inside_string_literal() {
    // deliberately conservative: the filter has no idea about quoting
    assert_eq!(
        Guard::check("SELECT * FROM t WHERE name = 'update'"),
        Verdict::Denied { keyword: "UPDATE" }
    );
}

#[test]
fn test_denies_keyword_inside_identifier() {
    // created_at contains CREATE; over-blocking is the accepted tradeoff
    assert_eq!(
        Guard::check("SELECT created_at FROM users"),
        Verdict::Denied { keyword: "CREATE" }
    );
}

#[test]
fn test_ignores_surrounding_whitespace() {
    assert_eq!(
        Guard::check("   \n  SELECT 1  \t"),
        Verdict::Allowed
    );
    assert_eq!(
        Guard::check("  \n truncate table users "),
        Verdict::Denied { keyword: "TRUNCATE" }
    );
}
