mod common;

use common::{Client, TestServer};
use rouilleftpd_engine::{AnonymousConfig, UserConfig};
use std::time::Duration;

#[tokio::test]
async fn anonymous_is_refused_by_default() {
    let server = TestServer::start(21400).await;
    let mut client = server.connect().await;
    assert_eq!(client.command("USER anonymous").await, "530 Not logged in");
    // An unknown user may try again.
    assert_eq!(client.command("USER john").await, "232 User logged in");
}

#[tokio::test]
async fn anonymous_login_with_any_password() {
    let server = TestServer::start_with(21420, Default::default(), |config| {
        config.anonymous = AnonymousConfig {
            allow_login: true,
            ..AnonymousConfig::default()
        };
    })
    .await;
    let mut client = server.connect().await;
    assert_eq!(
        client.command("USER anonymous").await,
        "331 Password required for anonymous"
    );
    assert_eq!(client.command("PASS guest@example.com").await, "230 Logged on");
    assert_eq!(client.command("PWD").await, "257 \"/\" is current directory");
}

#[tokio::test]
async fn wrong_password_closes_connection() {
    let server = TestServer::start_with(21440, Default::default(), |config| {
        config.users = vec![UserConfig::new("jane", "secret")];
    })
    .await;

    let mut client = server.connect().await;
    assert_eq!(client.command("USER jane").await, "331 Password required for jane");
    assert_eq!(
        client.command("PASS wrong").await,
        "530 Username or password incorrect"
    );
    assert!(client.is_closed().await);

    let mut client = server.connect().await;
    client.command("USER jane").await;
    assert_eq!(client.command("PASS secret").await, "230 Logged on");
}

#[tokio::test]
async fn commands_before_login_close_connection() {
    let server = TestServer::start(21460).await;
    let mut client = server.connect().await;
    assert_eq!(client.command("PWD").await, "530 Not logged in");
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn unknown_and_lowercase_verbs() {
    let server = TestServer::start(21480).await;
    let mut client = server.login().await;
    assert_eq!(client.command("XYZZ").await, "500 Command not implemented");
    assert_eq!(client.command("pwd").await, "500 Command not implemented");
    assert_eq!(client.command("NOOP").await, "200 OK");
    assert_eq!(client.command("SYST").await, "215 UNIX");
}

#[tokio::test]
async fn feat_lists_every_verb() {
    let server = TestServer::start(21500).await;
    let mut client = server.login().await;
    let reply = client.command("FEAT").await;
    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines.first(), Some(&"211-Features:"));
    assert_eq!(lines.last(), Some(&"211 End"));
    assert!(lines.contains(&" AUTH TLS"));
    assert!(lines.contains(&" AUTH SSL"));
    assert!(lines.contains(&" EPSV"));
    assert!(lines.contains(&" MFMT"));
}

#[tokio::test]
async fn protection_needs_buffer_size_first() {
    let server = TestServer::start(21520).await;
    let mut client = server.login().await;
    assert_eq!(client.command("PROT P").await, "503 PBSZ missing");
    assert_eq!(client.command("PBSZ 0").await, "200 PBSZ=0");
    assert_eq!(client.command("PROT P").await, "200 Protection level is P");
    assert_eq!(
        client.command("PROT X").await,
        "534 Protection level must be C or P"
    );
    assert_eq!(
        client.command("AUTH KERBEROS").await,
        "504 Unsupported auth type KERBEROS"
    );
}

#[tokio::test]
async fn restart_offset_must_be_a_number() {
    let server = TestServer::start(21540).await;
    let mut client = server.login().await;
    assert_eq!(client.command("REST -1").await, "550 Wrong restart offset");
    assert_eq!(client.command("REST abc").await, "550 Wrong restart offset");
    assert_eq!(client.command("REST 5").await, "350 Restarting at 5");
}

#[tokio::test]
async fn folders() {
    let server = TestServer::start(21560).await;
    let mut client = server.login().await;

    assert_eq!(client.command("MKD a/b").await, "250 Folder created successfully");
    assert!(server.path("a/b").is_dir());
    assert_eq!(client.command("MKD a").await, "550 Folder exists");

    assert_eq!(
        client.command("CWD a/b").await,
        "250 CWD successful. \"/a/b/\" is current directory"
    );
    assert_eq!(client.command("PWD").await, "257 \"/a/b/\" is current directory");
    assert_eq!(
        client.command("CDUP").await,
        "250 CWD successful. \"/a/\" is current directory"
    );
    assert_eq!(client.command("CWD missing").await, "530 CWD not successful");
    assert_eq!(client.command("CWD ../../..").await, "530 CWD not successful");

    assert_eq!(client.command("RMD b").await, "250 Folder deleted successfully");
    assert!(!server.path("a/b").exists());
    assert_eq!(client.command("RMD b").await, "550 Folder not found");
    assert_eq!(client.command("RMD /").await, "550 Permission denied");
}

#[tokio::test]
async fn permission_flags_are_enforced() {
    let server = TestServer::start_with(21580, Default::default(), |config| {
        let mut john = UserConfig::without_password("john");
        john.permissions.allow_folder_create = false;
        john.permissions.allow_file_delete = false;
        config.users = vec![john];
    })
    .await;
    std::fs::write(server.path("keep.txt"), b"keep").unwrap();

    let mut client = server.login().await;
    assert_eq!(client.command("MKD new").await, "550 Permission denied");
    assert_eq!(client.command("DELE keep.txt").await, "550 Permission denied");
    assert_eq!(client.command("DELE missing.txt").await, "550 File not found");
    assert!(server.path("keep.txt").exists());
}

#[tokio::test]
async fn quit_says_goodbye() {
    let server = TestServer::start(21600).await;
    let mut client = server.login().await;
    assert_eq!(client.command("QUIT").await, "221 Goodbye");
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn connection_limit_rejects_extra_clients() {
    let server = TestServer::start_with(21620, Default::default(), |config| {
        config.server.max_connections = 1;
    })
    .await;
    let _first = server.login().await;

    let mut second = Client::connect(server.addr()).await;
    assert_eq!(
        second.reply().await,
        "421 Too many connections. Try again later."
    );
    assert!(second.is_closed().await);
}

#[tokio::test]
async fn stop_closes_open_sessions() {
    let mut server = TestServer::start(21640).await;
    let mut client = server.login().await;
    server.server.stop().await;
    assert!(client.is_closed().await);
    assert!(server.server.local_addr().is_none());
}

#[tokio::test]
async fn auth_tls_keeps_the_session() {
    let server = TestServer::start(22300).await;
    let mut client = server.login().await;
    client.command("MKD docs").await;
    client.command("CWD docs").await;

    let mut client = client.auth_tls(&server.connector).await;
    assert_eq!(client.command("PWD").await, "257 \"/docs/\" is current directory");
    assert_eq!(client.command("AUTH TLS").await, "503 Already using TLS");
    assert_eq!(client.command("NOOP").await, "200 OK");
}

#[tokio::test]
async fn login_after_auth_tls() {
    let server = TestServer::start(22480).await;
    let client = server.connect().await;
    let mut client = client.auth_tls(&server.connector).await;
    assert_eq!(client.command("USER john").await, "232 User logged in");
    assert_eq!(client.command("PWD").await, "257 \"/\" is current directory");
}

#[tokio::test]
async fn implicit_tls_listener() {
    let server = TestServer::start_with(22320, Default::default(), |config| {
        config.tls.enabled = true;
        config.server.secure_port = 0;
    })
    .await;
    std::fs::write(server.path("hello.txt"), b"hello").unwrap();

    let mut client = server.connect_secure().await;
    assert_eq!(client.command("AUTH TLS").await, "503 Already using TLS");
    assert_eq!(client.command("USER john").await, "232 User logged in");
    client.protect_data(&server.connector).await;
    let (data, reply) = client.download("RETR hello.txt").await;
    assert_eq!(data, b"hello");
    assert_eq!(reply, "226 Successfully transferred \"hello.txt\"");
    assert_eq!(client.command("QUIT").await, "221 Goodbye");
}

#[tokio::test]
async fn overlong_command_line_is_refused_whole() {
    let server = TestServer::start(22340).await;
    let mut client = server.login().await;
    let line = format!("MKD {}", "a".repeat(5000));
    assert_eq!(client.command(&line).await, "500 Command line too long");
    assert_eq!(client.command("NOOP").await, "200 OK");
    assert_eq!(std::fs::read_dir(server.dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn abandoned_transfer_frees_its_connection_slot() {
    let server = TestServer::start_with(22360, Default::default(), |config| {
        config.server.max_connections = 1;
    })
    .await;
    let mut first = server.login().await;
    assert!(first.command("EPSV").await.starts_with("229 "));
    assert_eq!(first.command("LIST").await, "150 Opening data channel");
    drop(first);

    let mut greeting = String::new();
    for _ in 0..40 {
        let mut second = Client::connect(server.addr()).await;
        greeting = second.reply().await;
        if greeting == "220 Welcome" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(greeting, "220 Welcome");
}

#[tokio::test]
async fn quit_is_answered_after_the_data_wait_gives_up() {
    let server = TestServer::start_with(22380, Default::default(), |config| {
        config.server.data_connection_timeout = 1;
    })
    .await;
    let mut client = server.login().await;
    assert!(client.command("EPSV").await.starts_with("229 "));
    assert_eq!(client.command("LIST").await, "150 Opening data channel");
    client.send("QUIT").await;

    let replies = tokio::time::timeout(Duration::from_secs(5), async {
        (client.reply().await, client.reply().await)
    })
    .await
    .unwrap();
    assert_eq!(replies.0, "425 Can't open data connection");
    assert_eq!(replies.1, "221 Goodbye");
}
