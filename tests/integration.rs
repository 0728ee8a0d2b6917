//! Integration tests for searching audit log files.

use auditq::{search_reader, AuditLog, Error, Projection, Query, Record};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

const SAMPLE: &str = "type=SYSCALL key=\"backup_watch\" msg=audit(1000.0:1):\ntype=PATH name=\"/etc/passwd\" msg=audit(1000.0:1):\n";

/// A realistic excerpt with enriched fields packed by the group separator.
const AUDIT_LOG: &str = concat!(
    "type=DAEMON_START msg=audit(1364481300.000:8000): op=start ver=2.2 format=raw auid=0 pid=1 res=success\n",
    "type=SYSCALL msg=audit(1364481363.243:24287): arch=c000003e syscall=2 success=no exit=-13 a0=7fffd19c5592 items=1 ppid=2686 pid=3538 auid=1000 uid=1000 comm=\"cat\" exe=\"/bin/cat\" key=\"sshd_config\"\u{1d}ARCH=x86_64 SYSCALL=open AUID=\"shadowman\" UID=\"shadowman\"\n",
    "type=CWD msg=audit(1364481363.243:24287): cwd=\"/home/shadowman\"\n",
    "type=PATH msg=audit(1364481363.243:24287): item=0 name=\"/etc/ssh/sshd_config\" inode=409248 mode=0100600 nametype=NORMAL\n",
    "type=PROCTITLE msg=audit(1364481363.243:24287): proctitle=636174002F6574632F737368\n",
    "type=SYSCALL msg=audit(1364481400.100:24288): arch=c000003e syscall=257 success=yes exit=3 items=2 pid=3540 comm=\"touch\" exe=\"/usr/bin/touch\" key=\"tmp_watch\"\n",
    "type=CWD msg=audit(1364481400.100:24288): cwd=\"/tmp\"\n",
    "type=PATH msg=audit(1364481400.100:24288): item=0 name=\"/tmp/\" inode=1 nametype=PARENT\n",
    "type=PATH msg=audit(1364481400.100:24288): item=1 name=\"/tmp/new=file\" inode=2 nametype=CREATE\n",
    "type=USER_CMD msg=audit(1364481450.000:24290): pid=3600 uid=0 cmd=ls cmdline=a=b res=success\n",
);

fn write_log(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn search(content: &str, pairs: &[(&str, &str)]) -> Vec<Record> {
    let file = write_log(content);
    let log = AuditLog::open(file.path(), Vec::<String>::new()).unwrap();
    log.search(&Query::from_pairs(pairs.iter().copied()).unwrap()).unwrap()
}

#[test]
fn test_rule_and_type_query() {
    let records = search(SAMPLE, &[("type", "PATH"), ("key", "backup_watch")]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name"), Some("/etc/passwd"));
}

#[test]
fn test_other_rule_suppresses_block() {
    let records = search(SAMPLE, &[("key", "other_rule")]);
    assert!(records.is_empty());
}

#[test]
fn test_time_bounds() {
    let line = "type=CWD msg=audit(500.0:1): cwd=/\n";
    assert!(search(line, &[("newer", "999")]).is_empty());
    assert_eq!(search(line, &[("older", "999")]).len(), 1);
}

#[test]
fn test_value_with_equals() {
    let records = search(AUDIT_LOG, &[("type", "USER_CMD")]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("cmdline"), Some("a=b"));
}

#[test]
fn test_unconstrained_query_returns_every_line_in_order() {
    let records = search(AUDIT_LOG, &[]);
    assert_eq!(records.len(), AUDIT_LOG.lines().count());

    for (record, raw) in records.iter().zip(AUDIT_LOG.lines()) {
        let expected_type = raw.split(' ').next().unwrap().trim_start_matches("type=");
        assert_eq!(record.get("type"), Some(expected_type));
    }
}

#[test]
fn test_line_strictly_increasing() {
    let records = search(AUDIT_LOG, &[("key", "sshd_config")]);
    let lines: Vec<u64> = records.iter().map(|r| r.line().unwrap()).collect();
    assert!(!lines.is_empty());
    assert!(lines.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_rule_key_keeps_leading_lines() {
    // DAEMON_START precedes any SYSCALL and carries no key, so it stays.
    let records = search(AUDIT_LOG, &[("key", "tmp_watch")]);
    let types: Vec<&str> = records.iter().filter_map(|r| r.get("type")).collect();
    assert_eq!(types, vec!["DAEMON_START", "SYSCALL", "CWD", "PATH", "PATH", "USER_CMD"]);
}

#[test]
fn test_group_separator_fields() {
    let records = search(AUDIT_LOG, &[("type", "^SYSCALL$"), ("key", "sshd_config")]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("AUID"), Some("shadowman"));
    assert_eq!(records[0].get("SYSCALL"), Some("open"));
    assert_eq!(records[0].get("timestamp"), Some("1364481363.243"));
}

#[test]
fn test_nametype_filter_vacuous_for_other_types() {
    let records = search(AUDIT_LOG, &[("key", "tmp_watch"), ("nametype", "CREATE")]);
    let paths: Vec<&str> = records
        .iter()
        .filter(|r| r.get("type") == Some("PATH"))
        .filter_map(|r| r.get("name"))
        .collect();
    assert_eq!(paths, vec!["/tmp/new=file"]);
    assert!(records.iter().any(|r| r.get("type") == Some("CWD")));
}

#[test]
fn test_query_bracketed_execve_argument() {
    let log = concat!(
        "type=EXECVE msg=audit(5.0:1): argc=2 a0=\"cat\" a1_len=8 a1[0]=\"abcd\" a1[1]=\"efgh\"\n",
        "type=EXECVE msg=audit(6.0:2): argc=2 a0=\"cat\" a1_len=8 a1[0]=\"wxyz\" a1[1]=\"efgh\"\n",
    );
    let records = search(log, &[("a1[0]", "^abcd$")]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("a1[0]"), Some("abcd"));
    assert_eq!(records[0].get("a1[1]"), Some("efgh"));
}

#[test]
fn test_projection() {
    let file = write_log(AUDIT_LOG);
    let log = AuditLog::open(file.path(), ["name", "line"]).unwrap();
    let query = Query::from_pairs([("type", "PATH")]).unwrap();

    let records = log.search(&query).unwrap();
    assert_eq!(records.len(), 3);
    for record in &records {
        assert!(record.fields().all(|f| f == "name" || f == "line"));
        assert!(record.contains_key("name"));
        assert!(record.contains_key("line"));
    }
}

#[test]
fn test_projection_of_absent_field() {
    let file = write_log(AUDIT_LOG);
    let log = AuditLog::open(file.path(), ["exe"]).unwrap();
    let records = log.search(&Query::from_pairs([("type", "CWD")]).unwrap()).unwrap();

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(Record::is_empty));
}

#[test]
fn test_idempotent() {
    let file = write_log(AUDIT_LOG);
    let log = AuditLog::open(file.path(), Vec::<String>::new()).unwrap();
    let query = Query::from_pairs([("key", "sshd_config"), ("newer", "1364481363")]).unwrap();

    let first = log.search(&query).unwrap();
    let second = log.search(&query).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_streaming_matches_collected() {
    let file = write_log(AUDIT_LOG);
    let log = AuditLog::open(file.path(), Vec::<String>::new()).unwrap();
    let query = Query::from_pairs([("type", "PATH")]).unwrap();

    let streamed: Vec<Record> = log.scan(&query).unwrap().map(Result::unwrap).collect();
    let collected = search_reader(Cursor::new(AUDIT_LOG), &query, &Projection::all()).unwrap();
    assert_eq!(streamed, collected);
}

#[test]
fn test_scan_stats() {
    let file = write_log(AUDIT_LOG);
    let log = AuditLog::open(file.path(), Vec::<String>::new()).unwrap();
    let query = Query::from_pairs([("key", "sshd_config")]).unwrap();

    let mut scan = log.scan(&query).unwrap();
    let count = scan.by_ref().filter(|r| r.is_ok()).count();
    let stats = *scan.stats();

    assert_eq!(stats.accepted, count as u64);
    assert_eq!(stats.lines, AUDIT_LOG.lines().count() as u64);
    assert_eq!(stats.block_suppressed, 1);
    assert_eq!(stats.prefiltered, 4);
}

#[test]
fn test_construction_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        AuditLog::open(dir.path(), Vec::<String>::new()),
        Err(Error::NotAFile(_))
    ));
    assert!(matches!(
        AuditLog::open(dir.path().join("nope"), Vec::<String>::new()),
        Err(Error::Io(_))
    ));
}
