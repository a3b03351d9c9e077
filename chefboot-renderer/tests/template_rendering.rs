use chefboot_core::Context;
use chefboot_renderer::{TemplateEngine, TemplateKind};
use rstest::rstest;

const PROXY_LINES: &[&str] = &[
    "http_proxy       '{}'",
    "https_proxy      '{}'",
    "ENV['http_proxy'] = '{}'",
    "ENV['https_proxy'] = '{}'",
    "ENV['HTTP_PROXY'] = '{}'",
    "ENV['HTTPS_PROXY'] = '{}'",
];

const CLIENT_TRAILER: &str = "validation_client_name 'chef-validator'\n\
json_attribs nil\n\
pid_file '/var/run/chef-client.pid'\n\
# Using default node name (fqdn)\n\
no_lazy_load true\n";

fn engine() -> TemplateEngine {
    TemplateEngine::new(None).expect("engine")
}

fn render(kind: TemplateKind, pairs: &[(&str, &str)]) -> String {
    engine()
        .render(kind, &Context::from_pairs(pairs.iter().copied()))
        .unwrap_or_else(|e| panic!("render {kind} failed: {e}"))
}

fn server_url_lines(out: &str) -> Vec<&str> {
    out.lines()
        .filter(|l| l.starts_with("chef_server_url"))
        .collect()
}

fn is_proxy_line(line: &str) -> bool {
    line.starts_with("http_proxy")
        || line.starts_with("https_proxy")
        || line.starts_with("ENV['http_proxy']")
        || line.starts_with("ENV['https_proxy']")
        || line.starts_with("ENV['HTTP_PROXY']")
        || line.starts_with("ENV['HTTPS_PROXY']")
}

#[test]
fn end_to_end_client_rb_example() {
    let out = render(
        TemplateKind::KickstartClient,
        &[
            ("chef_url", "https://chef.example.com"),
            ("proxy", ""),
            ("chef_node_name", "node1"),
        ],
    );

    let expected = format!(
        "log_level        :info\n\
         log_location     '/dev/null'\n\
         chef_server_url  'https://chef.example.com'\n\
         node_name        'node1'\n\
         {CLIENT_TRAILER}"
    );
    assert_eq!(out, expected);
}

#[test]
fn full_client_rb_with_every_section() {
    let out = render(
        TemplateKind::PreseedClient,
        &[
            ("chef_url", "https://10.145.88.211:443"),
            ("proxy", "http://10.145.81.1:3128"),
            ("ignore_proxy", "127.0.0.1,localhost"),
            ("chef_node_name", "host1.ostack"),
        ],
    );
    let expected = format!(
        "log_level        :info\n\
         log_location     '/dev/null'\n\
         chef_server_url  'https://10.145.88.211:443'\n\
         http_proxy       'http://10.145.81.1:3128'\n\
         https_proxy      'http://10.145.81.1:3128'\n\
         ENV['http_proxy'] = 'http://10.145.81.1:3128'\n\
         ENV['https_proxy'] = 'http://10.145.81.1:3128'\n\
         ENV['HTTP_PROXY'] = 'http://10.145.81.1:3128'\n\
         ENV['HTTPS_PROXY'] = 'http://10.145.81.1:3128'\n\
         no_proxy         '127.0.0.1,localhost'\n\
         ENV['no_proxy'] = '127.0.0.1,localhost'\n\
         ENV['NO_PROXY'] = '127.0.0.1,localhost'\n\
         node_name        'host1.ostack'\n\
         {CLIENT_TRAILER}"
    );
    assert_eq!(out, expected);
}

#[test]
fn empty_context_renders_only_fixed_lines() {
    let out = render(TemplateKind::KickstartClient, &[]);
    assert_eq!(
        out,
        format!("log_level        :info\nlog_location     '/dev/null'\n{CLIENT_TRAILER}")
    );
}

#[rstest]
#[case(None)]
#[case(Some(""))]
fn unset_proxy_emits_no_proxy_lines(#[case] proxy: Option<&str>) {
    let mut pairs = vec![("chef_url", "https://c")];
    if let Some(p) = proxy {
        pairs.push(("proxy", p));
    }
    let out = render(TemplateKind::KickstartClient, &pairs);
    assert!(!out.lines().any(is_proxy_line), "unexpected proxy line in:\n{out}");
}

#[rstest]
#[case("http://10.145.81.1:3128")]
#[case("http://user:pw@proxy.local:8080")]
fn set_proxy_emits_exactly_six_lines(#[case] proxy: &str) {
    let out = render(TemplateKind::KickstartClient, &[("proxy", proxy)]);
    let found: Vec<&str> = out.lines().filter(|l| is_proxy_line(l)).collect();
    let expected: Vec<String> = PROXY_LINES.iter().map(|l| l.replace("{}", proxy)).collect();
    assert_eq!(found, expected);
}

#[rstest]
#[case(TemplateKind::KickstartClient)]
#[case(TemplateKind::FallbackClient)]
#[case(TemplateKind::AdminKnife)]
#[case(TemplateKind::ServerKnife)]
fn chef_url_wins_everywhere(#[case] kind: TemplateKind) {
    let out = render(
        kind,
        &[
            ("chef_url", "https://chef.example.com"),
            ("compass_server", "10.1.0.12"),
            ("server", "10.1.0.1"),
        ],
    );
    let lines = server_url_lines(&out);
    assert_eq!(lines.len(), 1, "{kind}: {lines:?}");
    assert!(lines[0].ends_with("'https://chef.example.com'"));
    assert!(!out.contains("https://10.1.0.12"));
    assert!(!out.contains("https://10.1.0.1'"));
}

#[rstest]
#[case(None)]
#[case(Some(""))]
fn fallback_uses_compass_server_when_chef_url_unset(#[case] chef_url: Option<&str>) {
    let mut pairs = vec![("compass_server", "10.1.0.12"), ("server", "10.1.0.1")];
    if let Some(u) = chef_url {
        pairs.push(("chef_url", u));
    }
    let out = render(TemplateKind::FallbackClient, &pairs);
    assert_eq!(server_url_lines(&out), vec!["chef_server_url  'https://10.1.0.12'"]);
}

#[test]
fn fallback_uses_server_last() {
    let out = render(
        TemplateKind::FallbackClient,
        &[("chef_url", ""), ("compass_server", ""), ("server", "10.1.0.1")],
    );
    assert_eq!(server_url_lines(&out), vec!["chef_server_url  'https://10.1.0.1'"]);
    assert!(out.ends_with("no_lazy_load true\nssl_verify_mode :verify_none\n"));
}

#[test]
fn fallback_without_any_server_is_missing_variable() {
    let err = engine()
        .render(TemplateKind::FallbackClient, &Context::new())
        .unwrap_err();
    assert!(err.to_string().contains("'server'"), "got: {err}");
}

#[rstest]
#[case(Some("rhel7"), true)]
#[case(Some("rhel6"), false)]
#[case(Some("rhel7.1"), false)]
#[case(Some(""), false)]
#[case(None, false)]
fn verify_api_cert_only_for_rhel7(#[case] os_version: Option<&str>, #[case] expected: bool) {
    let mut pairs = vec![];
    if let Some(v) = os_version {
        pairs.push(("os_version", v));
    }
    let out = render(TemplateKind::AdminKnife, &pairs);
    assert_eq!(out.contains("verify_api_cert false\n"), expected, "{out}");
}

#[test]
fn admin_knife_fixed_lines() {
    let out = render(TemplateKind::AdminKnife, &[("os_version", "rhel7")]);
    assert_eq!(
        out,
        "log_level        :info\n\
         log_location     '/dev/null'\n\
         node_name                'admin'\n\
         client_key               '/etc/chef/admin.pem'\n\
         validation_client_name   'chef-validator'\n\
         validation_key           '/etc/chef/validation.pem'\n\
         syntax_check_cache_path  '/root/.chef/syntax_check_cache'\n\
         ssl_verify_mode :verify_none\n\
         verify_api_cert false\n"
    );
}

#[test]
fn server_knife_logs_to_stdout_and_defaults_to_localhost() {
    let out = render(TemplateKind::ServerKnife, &[]);
    assert!(out.contains("log_location             STDOUT\n"));
    assert_eq!(
        server_url_lines(&out),
        vec!["chef_server_url          'https://localhost:443'"]
    );
    assert!(out.ends_with("cookbook_path [ '/root/chef-repo/cookbooks' ]\n"));
}

#[test]
fn rendering_is_deterministic() {
    let ctx = Context::from_pairs([
        ("chef_url", "https://c"),
        ("proxy", "http://p"),
        ("ignore_proxy", "localhost"),
        ("chef_node_name", "n"),
        ("os_version", "rhel7"),
        ("server", "s"),
    ]);
    let engine = engine();
    for kind in TemplateKind::all() {
        let first = engine.render(*kind, &ctx).unwrap();
        let second = engine.render(*kind, &ctx).unwrap();
        assert_eq!(first, second, "{kind} output differs between runs");
        assert!(!first.contains('\r'));
    }
}

#[test]
fn unknown_variables_do_not_change_output() {
    let base = render(TemplateKind::KickstartClient, &[("chef_url", "https://c")]);
    let noisy = render(
        TemplateKind::KickstartClient,
        &[("chef_url", "https://c"), ("kernel_options", "quiet")],
    );
    assert_eq!(base, noisy);
}
