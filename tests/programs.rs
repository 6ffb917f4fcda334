//! Larger NaC programs run end to end, each checked against its full
//! expected output.

use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

fn run_program(source: &str) -> assert_cmd::assert::Assert {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("program.nac");
    fs::write(&path, source).expect("write program");

    Command::cargo_bin("nac")
        .expect("nac binary")
        .arg(&path)
        .assert()
}

#[test]
fn test_fibonacci() {
    let source = r#"
fn fib(n) {
    if (n < 2) { rn n; } : { };
    rn fib(n - 1) + fib(n - 2);
};

for (i = 0; i < 10; i++) {
    out(fib(i));
};
"#;
    run_program(source)
        .success()
        .stdout("0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n");
}

#[test]
fn test_bubble_sort() {
    let source = r#"
a = [5, 3, 8, 1];
n = length(a);
for (i = 0; i < n; i++) {
    for (j = 0; j < n - 1; j++) {
        if (a[j + 1] < a[j]) {
            t = a[j];
            a[j] = a[j + 1];
            a[j + 1] = t;
        } : { };
    };
};
out(join(a, ","));
"#;
    run_program(source).success().stdout("1,3,5,8\n");
}

#[test]
fn test_factorial_with_while() {
    let source = r#"
f = 1;
n = 5;
while (n > 1) {
    f = f * n;
    n--;
};
out(f);
"#;
    run_program(source).success().stdout("120\n");
}

#[test]
fn test_fizzbuzz() {
    let source = r#"
for (i = 1; i <= 15; i++) {
    if (i % 15 == 0) {
        out("fizzbuzz");
    } : {
        if (i % 3 == 0) {
            out("fizz");
        } : {
            if (i % 5 == 0) {
                out("buzz");
            } : {
                out(i);
            };
        };
    };
};
"#;
    run_program(source).success().stdout(
        "1\n2\nfizz\n4\nbuzz\nfizz\n7\n8\nfizz\nbuzz\n11\nfizz\n13\n14\nfizzbuzz\n",
    );
}

#[test]
fn test_functions_compose() {
    let source = r#"
fn mul(a, b) { rn a * b; };
fn add(a, b) { rn a + b; };
out(add(mul(2, 3), 4));
"#;
    run_program(source).success().stdout("10\n");
}

#[test]
fn test_globals_are_readable_inside_functions() {
    let source = r#"
x = 10;
fn double_x() { rn x * 2; };
out(double_x());
out(x);
"#;
    run_program(source).success().stdout("20\n10\n");
}

#[test]
fn test_string_pipeline() {
    let source = r#"
names = ["ada", "grace", "edsger"];
line = join(slice(names, 0, 2), ", ");
out(upper(replace(line, ", ", " & ")));
out(indexOf("hello world", "world"));
out(substr("hello world", 6, 5));
"#;
    run_program(source)
        .success()
        .stdout("ADA & GRACE\n6\nworld\n");
}

#[test]
fn test_mixed_array_display() {
    let source = r#"out([1, 2.5, "s", [9]]);"#;
    run_program(source).success().stdout("[1, 2.5, \"s\", ?]\n");
}

#[test]
fn test_array_statistics() {
    let source = r#"
values = array(5);
for (i = 0; i < 5; i++) {
    values[i] = i * i;
};
sum = 0;
for (i = 0; i < length(values); i++) {
    sum = sum + values[i];
};
out(sum);
out(first(values) + last(values));
out(reverse(values));
"#;
    run_program(source)
        .success()
        .stdout("30\n16\n[16, 9, 4, 1, 0]\n");
}

#[test]
fn test_countdown_with_continue() {
    let source = r#"
for (i = 0; i < 6; i++) {
    if (i % 2 == 0) { continue; } : { };
    out(i);
};
"#;
    run_program(source).success().stdout("1\n3\n5\n");
}
