//! Builds project trees shaped like raw template expansion output, sentinel
//! directories and leaked files included.

#![allow(dead_code)]

use postgen::options::{Options, RawContext};
use std::fs;
use std::path::Path;

pub const PACKAGE: &str = "demo";

pub const STALE_CONFTEST: &str = "\"\"\"Pytest configuration and fixtures.\"\"\"\n\nimport pytest\n";
pub const LEAKED_AUTH_INIT: &str = "\"\"\"Authentication.\"\"\"\n\nfrom demo_api.auth.jwt import create_access_token\n";
pub const LEAKED_V1_INIT: &str = "\"\"\"Version 1 routers.\"\"\"\n\nfrom .example import router\n";

pub fn context(flags: &[(&str, bool)]) -> RawContext {
    let mut raw = RawContext::new();
    raw.insert("package_name".to_string(), PACKAGE.to_string());
    for (name, enabled) in flags {
        raw.insert(name.to_string(), if *enabled { "True" } else { "False" }.to_string());
    }
    raw
}

/// Resolves `pairs` plus the shared package name.
pub fn options(pairs: &[(&str, &str)]) -> Options {
    let mut raw: RawContext = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    raw.insert("package_name".to_string(), PACKAGE.to_string());
    Options::resolve(&raw).unwrap()
}

fn enabled(flags: &[(&str, bool)], name: &str) -> bool {
    flags.iter().any(|(n, v)| *n == name && *v)
}

pub fn touch(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Materializes what the templating engine writes for the given flags.
pub fn expand(root: &Path, flags: &[(&str, bool)]) {
    let on = |name: &str| enabled(flags, name);

    touch(root, "src/demo/__init__.py", "\"\"\"demo.\"\"\"\n");
    touch(root, "src/demo/logging.py", "import logging\n");
    touch(root, "tests/conftest.py", STALE_CONFTEST);
    touch(root, "tests/test_demo/test_logging.py", "def test_logging(): ...\n");
    touch(root, "envs/base.env", "ENVIRONMENT=dev\n");
    touch(root, "test", "#!/bin/sh\nuv run pytest \"$@\"\n");
    touch(root, "docker-compose.yaml", "services: {}\n");
    touch(root, ".dockerignore", ".venv\n");
    touch(root, "docker/web/Dockerfile", "FROM python:3.12\n");
    touch(root, "docker/api/Dockerfile", "FROM python:3.12\n");
    touch(root, "docker/lambda-api/Dockerfile", "FROM public.ecr.aws/lambda/python\n");

    if on("sentry") {
        touch(root, "src/demo/sentry.py", "import sentry_sdk\n");
    } else {
        touch(root, "src/sentry.py", "");
    }

    if on("api") {
        touch(root, "src/demo_api/__init__.py", "from demo_api.main import app\n");
        touch(root, "src/demo_api/main.py", "app = FastAPI()\n");
        touch(root, "src/demo_api/config.py", "class Settings: ...\n");
        touch(root, "src/demo_api/middleware/__init__.py", "");
        touch(root, "src/demo_api/routers/__init__.py", "\"\"\"API routers package.\"\"\"\n");
        touch(root, "src/demo_api/routers/health.py", "router = APIRouter()\n");
        touch(root, "tests/unit/test_demo_api/conftest.py", "import pytest\n");
        touch(root, "tests/unit/test_demo_api/test_health.py", "def test_health(): ...\n");

        if on("api_auth") {
            touch(root, "src/demo_api/auth/__init__.py", LEAKED_AUTH_INIT);
            touch(root, "src/demo_api/auth/jwt.py", "from jose import jwt\n");
            touch(root, "src/demo_api/auth/schemas.py", "class TokenData: ...\n");
            touch(root, "src/demo_api/routers/auth.py", "router = APIRouter()\n");
            touch(root, "tests/unit/test_demo_api/test_auth.py", "def test_auth(): ...\n");
        } else {
            touch(root, "src/demo_api/_auth_disabled/jwt", "\"\"\"JWT token utilities.\"\"\"\n");
            touch(root, "src/demo_api/__init__.py", LEAKED_AUTH_INIT);
            touch(root, "src/demo_api/jwt.py", "from jose import jwt\n");
            touch(root, "src/demo_api/schemas.py", "class TokenData: ...\n");
            touch(root, "src/demo_api/routers/auth.py", "router = APIRouter()\n");
            touch(root, "tests/unit/test_demo_api/test_auth.py", "def test_auth(): ...\n");
        }

        if on("api_versioning") {
            touch(root, "src/demo_api/routers/v1/__init__.py", LEAKED_V1_INIT);
            touch(root, "src/demo_api/routers/v1/example.py", "router = APIRouter()\n");
        } else {
            touch(root, "src/demo_api/routers/_v1_disabled/README", "");
            touch(root, "src/demo_api/routers/__init__.py", LEAKED_V1_INIT);
            touch(root, "src/demo_api/routers/example.py", "router = APIRouter()\n");
        }
    } else {
        touch(root, "src/_api_disabled/config.py", "class Settings: ...\n");
        touch(root, "src/_api_disabled/_auth_disabled/jwt", "");
        touch(root, "src/_api_disabled/middleware/__init__.py", "");
        touch(root, "src/__init__.py", "from demo_api.main import app\n");
        touch(root, "src/main.py", "app = FastAPI()\n");
        touch(root, "src/jwt.py", "from jose import jwt\n");
        touch(root, "src/routers/health.py", "router = APIRouter()\n");
        touch(root, "src/schemas/base.py", "class Base: ...\n");
        touch(root, "tests/unit/_test_api_disabled/test_config.py", "");
        touch(root, "tests/unit/test_health.py", "def test_health(): ...\n");
        touch(root, "tests/unit/conftest.py", "import pytest\n");
    }

    if on("cli") {
        touch(root, "src/demo_cli/__main__.py", "def main(): ...\n");
        touch(root, "tests/unit/test_demo_cli/test_cli.py", "def test_cli(): ...\n");
    } else {
        touch(root, "src/_cli_disabled/__init__.py", "");
        touch(root, "src/__main__.py", "def main(): ...\n");
        touch(root, "tests/unit/test_cli.py", "def test_cli(): ...\n");
    }

    if on("web") {
        touch(root, "src/demo_web/__init__.py", "");
        touch(root, "src/demo_web/settings.py", "DEBUG = False\n");
        touch(root, "src/demo_web/urls.py", "urlpatterns = []\n");
        touch(root, "tests/unit/test_demo_web/test_django.py", "def test_django(): ...\n");
    } else {
        touch(root, "src/_web_disabled/settings.py", "DEBUG = False\n");
        touch(root, "src/urls.py", "urlpatterns = []\n");
        touch(root, "src/__init__.py", "");
        touch(root, "tests/unit/_test_web_disabled/test_django.py", "");
        touch(root, "tests/unit/test_django.py", "def test_django(): ...\n");
    }

    if on("api_lambda") {
        touch(root, "tests/integration/conftest.py", "");
        touch(root, "tests/smoke/test_smoke.py", "");
        touch(root, "tests/common/http.py", "");
        touch(root, "envs/docker-compose/api.env", "");
    } else {
        touch(root, "tests/_integration_disabled/conftest.py", "");
        touch(root, "tests/_smoke_disabled/test_smoke.py", "");
        touch(root, "tests/_common_disabled/http.py", "");
        touch(root, "envs/_docker_compose_disabled/api.env", "");
        touch(root, "docker/_lambda_api_disabled/Dockerfile", "");
    }

    if on("github_actions") {
        touch(root, ".github/workflows/ci.yaml", "on: push\n");
    } else {
        touch(root, "_.github_disabled/workflows/ci.yaml", "on: push\n");
    }
}

/// Every combination of the given flag names, merged onto `base`.
pub fn combinations<'a>(names: &[&'a str], base: &[(&'a str, bool)]) -> Vec<Vec<(&'a str, bool)>> {
    (0..(1u32 << names.len()))
        .map(|mask| {
            let mut flags: Vec<(&str, bool)> = base.to_vec();
            for (i, name) in names.iter().enumerate() {
                flags.push((*name, (mask & (1 << i)) != 0));
            }
            flags
        })
        .collect()
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}
