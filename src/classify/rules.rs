use super::category::Category;
use fancy_regex::Regex;

/// One ordered classification rule.
///
/// The table position encodes specificity and is the tie-break: the first
/// rule whose pattern matches wins and nothing later is consulted.
pub struct Rule {
    pub category: Category,
    pub pattern: Regex,
    pub id: &'static str,
}

fn rule(category: Category, pattern: &str, id: &'static str) -> Rule {
    Rule {
        category,
        pattern: Regex::new(pattern).expect("classification patterns are valid"),
        id,
    }
}

/// Build the fixed, ordered rule table.
///
/// Order is a correctness invariant, not a style choice: several patterns
/// are duplicated across categories (connection failures under both
/// Infrastructure Error and Network Error, timeouts under both Timeout and
/// Infrastructure Timeout) and position is what resolves them. Do not
/// reorder or deduplicate.
#[allow(clippy::too_many_lines)]
pub fn rule_table() -> Vec<Rule> {
    use Category as C;
    vec![
        // test failures
        rule(C::TestFailure, r"(?i)\b(junit|testng|pytest|jest|mocha).*\s+(failed|failure|error)\b", "test_framework_error"),
        rule(C::TestFailure, r"(?i)\bassertion\s*(error|failed|failure)\b", "test_assertion_failure"),
        rule(C::TestFailure, r"(?i)\btest\s+(failed|failure|failures|failing)\b", "test_failure_generic"),
        rule(C::TestFailure, r"(?i)\btest\s+.*\s+(failed|failure|error)\b", "test_execution_error"),
        rule(C::TestFailure, r"(?i)\.test\.|Test.*\.(java|kt|scala)|.*Test\.(py|js|ts)", "test_file_reference"),
        rule(C::TestFailure, r"(?i)\btest\s+suite.*(failed|error|exception)\b", "test_suite_failure"),
        rule(C::TestFailure, r"(?i)\b(test|tests)\s+(are|is)\s+(failing|broken)\b", "test_status_failure"),
        // compilation errors
        rule(C::CompilationError, r"(?i)\bsyntax\s+error|parse\s+error|compilation\s+error\b", "syntax_parse_error"),
        rule(C::CompilationError, r"(?i)\b(compilation|compile).*\s+(error|failed|failure)\b", "compilation_failure"),
        rule(C::CompilationError, r"(?i)\bcannot\s+resolve|could\s+not\s+resolve|unresolved\b", "unresolved_symbol"),
        rule(C::CompilationError, r"(?i)\bpackage.*not\s+found|class.*not\s+found|module.*not\s+found\b", "missing_dependency"),
        rule(C::CompilationError, r"(?i)\btype\s+error|type\s+mismatch|type\s+check\s+failed\b", "type_check_error"),
        // build errors
        rule(C::BuildError, r"(?i)\brelation\s+.*\s+does\s+not\s+exist\b", "missing_db_relation"),
        rule(C::BuildError, r"(?i)\bcolumn\s+.*\s+does\s+not\s+exist\b", "schema_mismatch"),
        rule(C::BuildError, r"(?i)\bbuild\s+(failed|failure|error|broken)\b", "build_failure"),
        rule(C::BuildError, r"(?i)\bbuild\s+.*\s+(failed|error|aborted|stopped)\b", "build_process_error"),
        // runtime errors: application logic, not infrastructure
        rule(C::RuntimeError, r"(?i)\bduplicate\s+key.*violation\b", "duplicate_key_violation"),
        rule(C::RuntimeError, r"(?i)\bduplicate\s+key\s+value\b", "duplicate_key_value"),
        rule(C::RuntimeError, r"(?i)\bviolates\s+foreign\s+key\s+constraint\b", "foreign_key_violation"),
        rule(C::RuntimeError, r"(?i)\bdetachedinstanceerror\b", "orm_detached_instance"),
        rule(C::RuntimeError, r"(?i)\bdetached\s+instance\b", "orm_session_error"),
        // security / permission errors
        rule(C::SecurityPermissionError, r"(?i)\bsslhandshakeexception\b", "ssl_handshake_exception"),
        rule(C::SecurityPermissionError, r"(?i)\bssl\s+handshake\s+(failed|error|exception)\b", "ssl_handshake_failure"),
        rule(C::SecurityPermissionError, r"(?i)\bcertificate\s+verify\s+failed|certificate_verify_failed\b", "ssl_cert_verify_failed"),
        rule(C::SecurityPermissionError, r"(?i)\bssl.*certificate.*(error|failed|invalid|verify)\b", "ssl_cert_error"),
        rule(C::SecurityPermissionError, r"(?i)\bauthentication\s+(failed|error|failure|denied)\b", "auth_failure"),
        rule(C::SecurityPermissionError, r"(?i)\bunauthorized|auth\s+(error|failed|failure)\b", "unauthorized"),
        rule(C::SecurityPermissionError, r"(?i)\binvalid\s+(credentials|token|password|api\s+key)\b", "invalid_credentials"),
        rule(C::SecurityPermissionError, r"(?i)\btoken\s+(expired|invalid|missing)|session\s+expired\b", "token_expired"),
        rule(C::SecurityPermissionError, r"(?i)\bpermission\s+(denied|error|failed)\b", "permission_denied"),
        rule(C::SecurityPermissionError, r"(?i)\baccess\s+(denied|forbidden|refused)\b", "access_denied"),
        rule(C::SecurityPermissionError, r"(?i)\b(cannot|could\s+not|unable\s+to)\s+(write|create|delete|modify|access)\b", "filesystem_permission"),
        rule(C::SecurityPermissionError, r"(?i)\binsufficient\s+permissions|read\s+only|write\s+protected\b", "insufficient_permissions"),
        // authentication errors
        rule(C::AuthenticationError, r"(?i)\bpermissiondeniedexception\b", "permission_denied_exception"),
        rule(C::AuthenticationError, r"(?i)\bacl\s+token.*(error|failed|failure|invalid|missing|expired)\b", "acl_token_error"),
        rule(C::AuthenticationError, r"(?i)\bjwt\s+public\s+key.*(error|failed|failure|invalid|missing|not\s+found)\b", "jwt_public_key_error"),
        rule(C::AuthenticationError, r"(?i)\binvalid\s+token\b", "invalid_token"),
        rule(C::AuthenticationError, r"(?i)\b401\b|\bhttp\s+401\b|status\s+code\s+401\b", "http_401_unauthorized"),
        // configuration errors
        rule(C::ConfigurationError, r"(?i)\bconfig\s+refresh\s+failed\b", "config_refresh_failed"),
        // availability errors
        rule(C::AvailabilityError, r"(?i)\brequest\s+failed\s+after\s+retries\b", "request_failed_retries"),
        rule(C::AvailabilityError, r"(?i)\breturning\s+503\b", "returning_503"),
        rule(C::AvailabilityError, r"(?i)\bservice\s+unavailable\b", "service_unavailable"),
        rule(C::AvailabilityError, r"(?i)\b503\s+(error|failed|failure|unavailable)\b", "http_503"),
        rule(C::AvailabilityError, r"(?i)\bhttp\s+503\b|status\s+code\s+503\b", "http_status_503"),
        rule(C::AvailabilityError, r"(?i)\bliveness\s+check\s+failed\b", "liveness_check_failed"),
        // timeouts and rate limits
        rule(C::Timeout, r"(?i)\brate\s+limit\s+exceeded\b", "rate_limit_exceeded"),
        rule(C::Timeout, r"(?i)\b(ratelimiterror|rate.*limit).*\s+(exceeded|reached|hit)\b", "rate_limit_error"),
        rule(C::Timeout, r"(?i)\b(request|operation|connection|health\s+check|container).*\s+timeout\b", "operation_timeout"),
        rule(C::Timeout, r"(?i)\bexceeded.*time.*limit|time.*limit.*exceeded\b", "time_limit_exceeded"),
        rule(C::Timeout, r"(?i)\b(timeout|timed\s+out|time\s+out)\b", "timeout_generic"),
        // tooling errors: analyzers, linters, package managers, build tools
        rule(C::ToolingError, r"(?i)\b(stackanalyzer|stacktraceextractor|rootcauseengine).*\s+(error|failed|failure|exception)\b", "internal_tool_failure"),
        rule(C::ToolingError, r"(?i)\brootcauseengine.*\s+(error|failed|failure|exception)\b", "rootcause_engine_failure"),
        rule(C::ToolingError, r"(?i)\b(analyzer|logparser).*\s+(error|failed|failure|exception)\b", "analyzer_failure"),
        rule(C::ToolingError, r"(?i)\bfailed\s+to\s+parse\s+stack\s+trace\b", "stack_parse_failure"),
        rule(C::ToolingError, r"(?i)\bmalformed\s+stack\s+trace\b", "malformed_stack_trace"),
        rule(C::ToolingError, r"(?i)\bnull\s+pointer.*(during|while).*classification\b", "root_cause_engine_npe"),
        rule(C::ToolingError, r"(?i)\bnull\s+pointer.*computing.*failure\s+signature\b", "root_cause_engine_npe_alt"),
        rule(C::ToolingError, r"(?i)\billegalargumentexception.*malformed\s+stack\s+trace\b", "parser_illegal_argument"),
        rule(C::ToolingError, r"(?i)\b(stack|trace|log).*parser.*\s+(error|failed|failure|exception)\b", "log_parser_failure"),
        rule(C::ToolingError, r"(?i)\bunexpected\s+token.*\s+at\s+line\b", "parser_syntax_error"),
        rule(C::ToolingError, r"(?i)\blint.*(error|failed|failure|warning)\b", "lint_error"),
        rule(C::ToolingError, r"(?i)\blinting\s+(failed|error)|code\s+style\s+error\b", "linting_failure"),
        rule(C::ToolingError, r"(?i)\b(maven|gradle|npm|pip|yarn|pypi|composer|nuget|go\s+mod).*\s+(error|failed|failure)\b", "package_manager_error"),
        rule(C::ToolingError, r"(?i)\bdependency.*(error|failed|failure|missing|not\s+found)\b", "dependency_error"),
        rule(C::ToolingError, r"(?i)\bcannot\s+resolve.*dependency|failed\s+to\s+resolve\b", "dependency_resolution_failure"),
        rule(C::ToolingError, r"(?i)\bversion\s+conflict|dependency\s+conflict|conflicting\s+dependencies\b", "version_conflict"),
        rule(C::ToolingError, r"(?i)\b(eslint|pylint|flake8|black|prettier|rubocop|gofmt).*\s+(error|failed|failure)\b", "code_formatter_error"),
        rule(C::ToolingError, r"(?i)\b(make|cmake|ant|sbt|leiningen).*\s+(error|failed|failure)\b", "build_tool_error"),
        // infrastructure errors: CI executors, containers
        rule(C::InfrastructureError, r"(?i)\bci\s+executor.*lost\s+heartbeat\b", "ci_executor_heartbeat_lost"),
        rule(C::InfrastructureError, r"(?i)\bexecutor.*lost\s+heartbeat|heartbeat.*lost\b", "executor_heartbeat_lost"),
        rule(C::InfrastructureError, r"(?i)\bcontainer.*(oomkilled|oom.*killed)\b", "container_oom_killed"),
        rule(C::InfrastructureError, r"(?i)\bcontainer\s+terminated\b", "container_terminated"),
        // resource exhaustion
        rule(C::ResourceError, r"(?i)\bheap\s+usage\s+critical\b", "heap_usage_critical"),
        rule(C::ResourceError, r"(?i)\bto-space\s+exhausted\b", "to_space_exhausted"),
        rule(C::ResourceError, r"(?i)\bGC\s+(error|failed|failure|exhausted|critical)\b", "gc_error"),
        rule(C::ResourceError, r"(?i)\bgarbage\s+collection.*(error|failed|failure|exhausted|critical)\b", "garbage_collection_error"),
        rule(C::ResourceError, r"(?i)\bOutOfMemory\b", "out_of_memory_exception"),
        rule(C::ResourceError, r"(?i)\bOOMKilled\b", "oom_killed"),
        rule(C::ResourceError, r"(?i)\bMemoryMonitor.*(error|failed|failure|critical|exhausted)\b", "memory_monitor_error"),
        rule(C::ResourceError, r"(?i)\bexited\s+with\s+code\s+137\b", "exit_code_137"),
        rule(C::ResourceError, r"(?i)\bexit\s+code\s+137\b", "exit_code_137_alt"),
        rule(C::ResourceError, r"(?i)\bcuda\s+out\s+of\s+memory|cuda\s+oom\b", "cuda_oom"),
        rule(C::ResourceError, r"(?i)\bsigkill|killed\s+by\s+signal\s+9\b", "sigkill"),
        rule(C::ResourceError, r"(?i)\bconnection\s+pool\s+exhausted\b", "connection_pool_exhausted"),
        rule(C::ResourceError, r"(?i)\bmemory\s+pressure\s+(critical|high)\b", "memory_pressure"),
        rule(C::ResourceError, r"(?i)\bmemory\s+pressure\b", "memory_pressure_generic"),
        rule(C::ResourceError, r"(?i)\btriggering\s+graceful\s+shutdown\b", "graceful_shutdown_memory"),
        rule(C::ResourceError, r"(?i)\bout\s+of\s+memory\b", "out_of_memory"),
        rule(C::ResourceError, r"(?i)\bmemory\s+(error|exhausted|limit)\b", "memory_error"),
        rule(C::ResourceError, r"(?i)\bdisk\s+(full|space|quota)|no\s+space\s+left\b", "disk_full"),
        rule(C::ResourceError, r"(?i)\bsystem\s+resource\s+(exhausted|limit|quota)\b", "system_resource_exhausted"),
        rule(C::ResourceError, r"(?i)\bcannot\s+allocate|allocation\s+failed|quota\s+exceeded\b", "allocation_failed"),
        // infrastructure errors: messaging, connections, DNS, config
        rule(C::InfrastructureError, r"(?i)\bkafka.*failed\s+to\s+publish\s+event\b", "kafka_publish_failure"),
        rule(C::InfrastructureError, r"(?i)\bkafka.*failed\s+to\s+send\s+message\b", "kafka_send_failure"),
        rule(C::InfrastructureError, r"(?i)\b(kafka|zookeeper).*\s+metadata.*timeout\b", "kafka_metadata_timeout"),
        rule(C::InfrastructureError, r"(?i)\btopic.*not\s+present\s+in\s+metadata\b", "kafka_topic_missing"),
        rule(C::InfrastructureError, r"(?i)\btimeoutexception.*topic.*not\s+present\s+in\s+metadata\b", "kafka_timeout_topic_missing"),
        rule(C::InfrastructureError, r"(?i)\bconnection\s+(refused|reset|closed|dropped|failed)\b", "connection_failure"),
        rule(C::InfrastructureError, r"(?i)\bdatabase\s+connection\s+(failed|error|lost|refused)\b", "database_connection_failure"),
        rule(C::InfrastructureError, r"(?i)\b(redis|postgres|mysql|mongodb|elasticsearch).*\s+connection\s+(refused|failed|error)\b", "service_connection_failure"),
        rule(C::InfrastructureError, r"(?i)\b(dns|hostname|resolve).*\s+(error|failed|unreachable|not\s+found)\b", "dns_resolution_failure"),
        rule(C::InfrastructureError, r"(?i)\b(network|socket|http|tcp|udp)\s+.*\s+(error|exception|failure|unreachable)\b", "network_protocol_error"),
        rule(C::InfrastructureError, r"(?i)\b(peer|server|client)\s+.*\s+(reset|refused|closed|unreachable)\b", "peer_connection_failure"),
        rule(C::InfrastructureError, r"(?i)\bservice\s+(unavailable|down|unreachable|not\s+found)\b", "service_unavailable"),
        rule(C::InfrastructureError, r"(?i)\brequired\s+.*\s+(configuration|config|value|setting|parameter).*\s+missing\b", "config_missing"),
        rule(C::InfrastructureError, r"(?i)\b(config|configuration|setting).*\s+(error|missing|invalid|not\s+found)\b", "config_error"),
        rule(C::InfrastructureError, r"(?i)\benvironment\s+variable.*missing|env\s+var.*not\s+set\b", "env_var_missing"),
        // database errors; the first four are deliberate catch-alls
        rule(C::DatabaseError, r"(?i)\borg\.postgresql\b", "postgresql_exception_catchall"),
        rule(C::DatabaseError, r"(?i)\bSQLSTATE\b", "sqlstate_catchall"),
        rule(C::DatabaseError, r"(?i)\bserializ(e|ation)\b", "serialize_catchall"),
        rule(C::DatabaseError, r"(?i)\brecovery\b", "recovery_catchall"),
        rule(C::DatabaseError, r"(?i)\btransaction\s+commit\s+failed\b", "transaction_commit_failed"),
        rule(C::DatabaseError, r"(?i)\bpsqlexception\b", "postgresql_exception"),
        rule(C::DatabaseError, r"(?i)\bpostgresql.*exception\b", "postgresql_error"),
        rule(C::DatabaseError, r"(?i)\bcanceling\s+statement\b", "statement_canceled"),
        rule(C::DatabaseError, r"(?i)\bwrite\s+aborted\s+after\s+retries\b", "write_aborted_retries"),
        rule(C::DatabaseError, r"(?i)\bserialization\s+failure\b", "concurrency_serialization"),
        rule(C::DatabaseError, r"(?i)\bcould\s+not\s+serialize\s+access\b", "concurrent_update_serialization"),
        rule(C::DatabaseError, r"(?i)\bcanceling\s+statement\s+due\s+to\s+conflict\s+with\s+recovery\b", "recovery_conflict"),
        rule(C::DatabaseError, r"(?i)\b(sql|database|db)\s+.*\s+(exception|error|failure)\b", "database_error"),
        rule(C::DatabaseError, r"(?i)\b(hikari.*pool|jdbc|datasource)\b", "connection_pool_ref"),
        rule(C::DatabaseError, r"(?i)\bconnection\s+(is\s+)?not\s+available\b", "connection_unavailable"),
        rule(C::DatabaseError, r"(?i)\b(query|transaction|sql)\s+timeout\b", "query_timeout"),
        rule(C::DatabaseError, r"(?i)\b(deadlock|lock\s+timeout|connection\s+refused)\b", "deadlock"),
        rule(C::DatabaseError, r"(?i)\bsql(transient|timeout|connection)?exception\b", "sql_exception"),
        rule(C::DatabaseError, r"(?i)\bdatabase\s+connection\s+(failed|error|lost)\b", "database_connection_failure"),
        // network errors
        rule(C::NetworkError, r"(?i)\bconnection\s+(reset|refused|closed|dropped|failed)\b", "connection_failure"),
        rule(C::NetworkError, r"(?i)\b(network|socket|http|tcp|udp)\s+.*\s+(error|exception|failure)\b", "network_protocol_error"),
        rule(C::NetworkError, r"(?i)\bconnection\s+timeout|network\s+unreachable\b", "network_timeout"),
        rule(C::NetworkError, r"(?i)\b(dns|hostname|resolve).*\s+(error|failed|unreachable)\b", "dns_resolution_failure"),
        rule(C::NetworkError, r"(?i)\b(connection|network|socket)\s+.*\s+(error|exception)\b", "network_error"),
        rule(C::NetworkError, r"(?i)\b(peer|server|client)\s+.*\s+(reset|refused|closed)\b", "peer_connection_failure"),
        // configuration errors
        rule(C::ConfigurationError, r"(?i)\brequired\s+.*\s+(configuration|config|value|setting|parameter).*\s+missing\b", "config_missing"),
        rule(C::ConfigurationError, r"(?i)\b(config|configuration|setting).*\s+(error|missing|invalid|not\s+found)\b", "config_error"),
        rule(C::ConfigurationError, r"(?i)\benvironment\s+variable.*missing|env\s+var.*not\s+set\b", "env_var_missing"),
        rule(C::ConfigurationError, r"(?i)\billegalstateexception.*required|required.*value.*missing\b", "required_value_missing"),
        rule(C::ConfigurationError, r"(?i)\b(missing|invalid|incorrect).*\s+(config|configuration|setting)\b", "config_invalid"),
        // infrastructure timeouts
        rule(C::InfrastructureTimeout, r"(?i)\b(timeout|timed\s+out|time\s+out)\b", "timeout_generic"),
        rule(C::InfrastructureTimeout, r"(?i)\b(request|operation|connection|health\s+check|container).*\s+timeout\b", "operation_timeout"),
        rule(C::InfrastructureTimeout, r"(?i)\bexceeded.*time.*limit|time.*limit.*exceeded\b", "time_limit_exceeded"),
        // dependency errors
        rule(C::DependencyError, r"(?i)\bdependency.*(error|failed|failure|missing|not\s+found)\b", "dependency_error"),
        rule(C::DependencyError, r"(?i)\bpackage.*not\s+found|module.*not\s+found|library.*missing\b", "package_missing"),
        rule(C::DependencyError, r"(?i)\b(maven|gradle|npm|pip|yarn).*\s+(error|failed|failure)\b", "package_manager_error"),
        rule(C::DependencyError, r"(?i)\bcannot\s+resolve.*dependency|failed\s+to\s+resolve\b", "dependency_resolution_failure"),
        rule(C::DependencyError, r"(?i)\bversion\s+conflict|dependency\s+conflict|conflicting\s+dependencies\b", "version_conflict"),
        // authentication errors (generic forms)
        rule(C::AuthenticationError, r"(?i)\bauthentication\s+(failed|error|failure|denied)\b", "auth_failure"),
        rule(C::AuthenticationError, r"(?i)\bunauthorized|auth\s+(error|failed|failure)\b", "unauthorized"),
        rule(C::AuthenticationError, r"(?i)\binvalid\s+(credentials|token|password|api\s+key)\b", "invalid_credentials"),
        rule(C::AuthenticationError, r"(?i)\btoken\s+(expired|invalid|missing)|session\s+expired\b", "token_expired"),
        // permission errors
        rule(C::PermissionError, r"(?i)\bpermission\s+(denied|error|failed)\b", "permission_denied"),
        rule(C::PermissionError, r"(?i)\baccess\s+(denied|forbidden|refused)\b", "access_denied"),
        rule(C::PermissionError, r"(?i)\b(cannot|could\s+not|unable\s+to)\s+(write|create|delete|modify|access)\b", "filesystem_permission"),
        rule(C::PermissionError, r"(?i)\binsufficient\s+permissions|read\s+only|write\s+protected\b", "insufficient_permissions"),
        // lint errors
        rule(C::LintError, r"(?i)\blint.*(error|failed|failure|warning)\b", "lint_error"),
        rule(C::LintError, r"(?i)\blinting\s+(failed|error)|code\s+style\s+error\b", "linting_failure"),
        // generic summary lines, not root causes
        rule(C::Other, r"(?i)\btask\s+failed\s+permanently\b", "task_failed_summary"),
        rule(C::Other, r"(?i)\bworkflow\s+failed\s+permanently\b", "workflow_failed_summary"),
    ]
}
