//! Release composition and addressing against fixture dependencies.
use shipcore_clients_kube::fixture::FixtureFactory;
use shipcore_context::Context;
use shipcore_injector::Injector;
use shipcore_models::Build;
use shipcore_models::Deploy;
use shipcore_models::DeployGroup;
use shipcore_models::JobStatus;
use shipcore_models::KubernetesCluster;
use shipcore_models::KubernetesRole;
use shipcore_models::Project;
use shipcore_models::Release;
use shipcore_models::Stage;
use shipcore_models::User;
use shipcore_store::query::CountReleases;
use shipcore_store::query::ListReleaseDocs;
use shipcore_store::Store;

use crate::errors::MissingRoles;
use crate::errors::MissingTargets;
use crate::errors::QuantityInvalid;
use crate::errors::RoleConfigMissing;
use crate::role_config::tests::MemoryRepository;
use crate::role_config::tests::DEPLOYMENT;
use crate::role_config::tests::STATEFUL_SET;
use crate::BlueGreenColor;
use crate::CreateReleaseParams;
use crate::DeployGroupEntry;
use crate::ReleaseComposer;
use crate::RoleEntry;

const PROJECT_ID: i64 = 1;
const STAGE_ID: i64 = 1;
const BLUE_GREEN_STAGE_ID: i64 = 2;

const APP_SERVER: i64 = 1;
const RESQUE_WORKER: i64 = 2;
const STORAGE: i64 = 3;
const FOREIGN_ROLE: i64 = 4;
const NO_CONFIG_ROLE: i64 = 5;

const POD1: i64 = 7;
const POD2: i64 = 8;

fn project() -> Project {
    Project {
        id: PROJECT_ID,
        name: "Foo".into(),
        permalink: "foo".into(),
    }
}

fn user() -> User {
    User {
        id: 1,
        name: "Deployer".into(),
        email: Some("deployer@example.com".into()),
    }
}

fn deploy_group(id: i64) -> DeployGroup {
    DeployGroup {
        id,
        name: format!("Pod {}", id),
        env_value: format!("pod{}", id),
        namespace: format!("pod{}", id),
        cluster_id: 1,
    }
}

fn role(id: i64) -> KubernetesRole {
    let (project_id, name, config_file) = match id {
        APP_SERVER => (PROJECT_ID, "app-server", "kubernetes/app_server.yml"),
        RESQUE_WORKER => (PROJECT_ID, "resque-worker", "kubernetes/resque_worker.yml"),
        STORAGE => (PROJECT_ID, "storage", "kubernetes/storage.yml"),
        FOREIGN_ROLE => (2, "other-app", "kubernetes/app_server.yml"),
        _ => (PROJECT_ID, "missing", "kubernetes/missing.yml"),
    };
    KubernetesRole {
        id,
        project_id,
        name: name.into(),
        config_file: config_file.into(),
        service_name: None,
    }
}

fn deploy(id: i64, stage_id: i64, job_status: JobStatus) -> Deploy {
    Deploy {
        id,
        project_id: PROJECT_ID,
        stage_id,
        git_ref: "master".into(),
        job_status,
    }
}

fn role_entry(role_id: i64, replicas: u32, cpu: f64, memory: u64) -> RoleEntry {
    RoleEntry {
        role: role(role_id),
        replicas: Some(replicas),
        requests_cpu: Some(cpu / 2.0),
        requests_memory: Some(memory / 2),
        limits_cpu: Some(cpu),
        limits_memory: Some(memory),
    }
}

fn params(deploy: Option<Deploy>, groups: Vec<(i64, Vec<RoleEntry>)>) -> CreateReleaseParams {
    let deploy_groups = groups
        .into_iter()
        .map(|(group_id, roles)| DeployGroupEntry {
            deploy_group: deploy_group(group_id),
            roles: Some(roles),
        })
        .collect();
    CreateReleaseParams {
        project: project(),
        user: user(),
        deploy,
        git_sha: "1a6f551a2ffa6d88e15eef5461384da0bfb1c194".into(),
        git_ref: "master".into(),
        deploy_groups: Some(deploy_groups),
    }
}

/// Injector with a populated fixture store and fixture Kubernetes clients.
async fn fixed_injector() -> (Injector, FixtureFactory) {
    let factory = FixtureFactory::default();
    let mut injector = Injector::fixture();
    injector
        .clients
        .kubernetes
        .with_url_factory("fixture", factory.clone());
    fixed_db(&injector.context, &injector.store).await;
    (injector, factory)
}

async fn fixed_db(context: &Context, store: &Store) {
    store.persist(context, project()).await.unwrap();
    store.persist(context, user()).await.unwrap();
    for (id, blue_green) in [(STAGE_ID, false), (BLUE_GREEN_STAGE_ID, true)] {
        let stage = Stage {
            id,
            project_id: PROJECT_ID,
            name: format!("stage-{}", id),
            blue_green,
        };
        store.persist(context, stage).await.unwrap();
    }
    let cluster = KubernetesCluster {
        id: 1,
        name: "pod-cluster".into(),
        api_url: "fixture://pod-cluster".into(),
    };
    store.persist(context, cluster).await.unwrap();
    for id in [POD1, POD2] {
        store.persist(context, deploy_group(id)).await.unwrap();
    }
    for id in [APP_SERVER, RESQUE_WORKER, STORAGE, FOREIGN_ROLE, NO_CONFIG_ROLE] {
        store.persist(context, role(id)).await.unwrap();
    }
}

fn composer(injector: &Injector) -> ReleaseComposer {
    let repository = MemoryRepository::default()
        .with_file("kubernetes/app_server.yml", DEPLOYMENT)
        .with_file("kubernetes/resque_worker.yml", DEPLOYMENT)
        .with_file("kubernetes/storage.yml", STATEFUL_SET);
    ReleaseComposer::new(injector.clone(), repository)
}

async fn count(injector: &Injector) -> u64 {
    injector
        .store
        .query(&injector.context, CountReleases(PROJECT_ID))
        .await
        .unwrap()
}

async fn create(injector: &Injector, params: CreateReleaseParams) -> Release {
    composer(injector)
        .create_release(&injector.context, params)
        .await
        .expect("release creation failed")
}

#[tokio::test]
async fn create_with_one_role() {
    let (injector, _) = fixed_injector().await;
    let release = create(
        &injector,
        params(None, vec![(POD1, vec![role_entry(APP_SERVER, 1, 1.0, 50)])]),
    )
    .await;
    assert_eq!(count(&injector).await, 1);

    let docs = injector
        .store
        .query(&injector.context, ListReleaseDocs::from(&release))
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].kubernetes_role_id, APP_SERVER);
    assert_eq!(docs[0].deploy_group_id, POD1);
    let role = crate::doc_role(&injector.context, &injector.store, &docs[0])
        .await
        .unwrap();
    assert_eq!(role.name, "app-server");
    assert!(!release.blue_phase);
}

#[tokio::test]
async fn create_with_multiple_roles() {
    let (injector, _) = fixed_injector().await;
    let roles = vec![
        role_entry(APP_SERVER, 1, 1.0, 50),
        role_entry(RESQUE_WORKER, 2, 2.0, 100),
    ];
    let release = create(&injector, params(None, vec![(POD1, roles)])).await;
    assert_eq!(count(&injector).await, 1);

    let docs = injector
        .store
        .query(&injector.context, ListReleaseDocs::from(&release))
        .await
        .unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].kubernetes_role_id, APP_SERVER);
    assert_eq!(docs[0].replica_target, 1);
    assert_eq!(docs[0].limits_cpu, 1.0);
    assert_eq!(docs[0].limits_memory, 50);
    assert_eq!(docs[1].kubernetes_role_id, RESQUE_WORKER);
    assert_eq!(docs[1].replica_target, 2);
    assert_eq!(docs[1].limits_cpu, 2.0);
    assert_eq!(docs[1].limits_memory, 100);
    assert!(docs[1].resource_template.contains("100Mi"));
}

#[tokio::test]
async fn create_uses_role_config_defaults() {
    let (injector, _) = fixed_injector().await;
    let entry = RoleEntry {
        role: role(APP_SERVER),
        replicas: None,
        requests_cpu: None,
        requests_memory: None,
        limits_cpu: None,
        limits_memory: Some(512),
    };
    let release = create(&injector, params(None, vec![(POD1, vec![entry])])).await;
    let docs = injector
        .store
        .query(&injector.context, ListReleaseDocs::from(&release))
        .await
        .unwrap();
    assert_eq!(docs[0].replica_target, 2);
    assert_eq!(docs[0].requests_cpu, 0.25);
    assert_eq!(docs[0].requests_memory, 64);
    assert_eq!(docs[0].limits_cpu, 1.0);
    assert_eq!(docs[0].limits_memory, 512);
}

#[tokio::test]
async fn fail_with_missing_deploy_groups() {
    let (injector, _) = fixed_injector().await;
    let composer = composer(&injector);
    for deploy_groups in [None, Some(Vec::new())] {
        let mut params = params(None, Vec::new());
        params.deploy_groups = deploy_groups;
        let error = composer
            .create_release(&injector.context, params)
            .await
            .unwrap_err();
        assert!(error.is::<MissingTargets>());
    }
    assert_eq!(count(&injector).await, 0);
}

#[tokio::test]
async fn fail_with_missing_roles() {
    let (injector, _) = fixed_injector().await;
    let composer = composer(&injector);
    for roles in [None, Some(Vec::new())] {
        let mut params = params(
            None,
            vec![(POD1, vec![role_entry(APP_SERVER, 1, 1.0, 50)]), (POD2, Vec::new())],
        );
        if let Some(groups) = params.deploy_groups.as_mut() {
            groups[1].roles = roles;
        }
        let error = composer
            .create_release(&injector.context, params)
            .await
            .unwrap_err();
        let error = error.downcast_ref::<MissingRoles>().unwrap();
        assert_eq!(error.index, 1);
    }
    assert_eq!(count(&injector).await, 0);
}

#[tokio::test]
async fn fail_with_invalid_cpu_overrides() {
    let (injector, _) = fixed_injector().await;
    let composer = composer(&injector);
    for cores in [-2.0, f64::NAN, f64::INFINITY] {
        let mut limited = role_entry(RESQUE_WORKER, 1, 1.0, 50);
        limited.limits_cpu = Some(cores);
        let mut requested = role_entry(RESQUE_WORKER, 1, 1.0, 50);
        requested.requests_cpu = Some(cores);
        for entry in [limited, requested] {
            let groups = vec![(POD1, vec![role_entry(APP_SERVER, 1, 1.0, 50), entry])];
            let error = composer
                .create_release(&injector.context, params(None, groups))
                .await
                .unwrap_err();
            assert!(error.is::<QuantityInvalid>());
        }
    }
    assert_eq!(count(&injector).await, 0);
}

#[tokio::test]
async fn fail_with_missing_role_config() {
    let (injector, _) = fixed_injector().await;
    let roles = vec![
        role_entry(APP_SERVER, 1, 1.0, 50),
        role_entry(NO_CONFIG_ROLE, 1, 1.0, 50),
    ];
    let error = composer(&injector)
        .create_release(&injector.context, params(None, vec![(POD1, roles)]))
        .await
        .unwrap_err();
    assert!(error.is::<RoleConfigMissing>());
    assert_eq!(count(&injector).await, 0);
}

#[tokio::test]
async fn fail_with_roles_of_other_projects() {
    let (injector, _) = fixed_injector().await;
    let roles = vec![
        role_entry(APP_SERVER, 1, 1.0, 50),
        role_entry(FOREIGN_ROLE, 1, 1.0, 50),
    ];
    let error = composer(&injector)
        .create_release(&injector.context, params(None, vec![(POD1, roles)]))
        .await
        .unwrap_err();
    assert!(error.is::<shipcore_store::errors::RoleProjectMismatch>());
    assert_eq!(count(&injector).await, 0);
}

#[tokio::test]
async fn blue_green_alternates_skipping_failed_deploys() {
    let (injector, _) = fixed_injector().await;
    let context = &injector.context;
    let store = &injector.store;
    let groups = || vec![(POD1, vec![role_entry(APP_SERVER, 1, 1.0, 50)])];

    let deploy_blue = deploy(10, BLUE_GREEN_STAGE_ID, JobStatus::Succeeded);
    store.persist(context, deploy_blue.clone()).await.unwrap();
    let first = create(&injector, params(Some(deploy_blue), groups())).await;
    assert!(first.blue_phase);

    let deploy_failed = deploy(11, BLUE_GREEN_STAGE_ID, JobStatus::Failed);
    store.persist(context, deploy_failed.clone()).await.unwrap();
    let second = create(&injector, params(Some(deploy_failed), groups())).await;
    assert!(!second.blue_phase);

    // The failed release is skipped so the phase still flips the first release.
    let deploy_green = deploy(12, BLUE_GREEN_STAGE_ID, JobStatus::Succeeded);
    store.persist(context, deploy_green.clone()).await.unwrap();
    let third = create(&injector, params(Some(deploy_green), groups())).await;
    assert!(!third.blue_phase);

    let deploy_next = deploy(13, BLUE_GREEN_STAGE_ID, JobStatus::Running);
    store.persist(context, deploy_next.clone()).await.unwrap();
    let fourth = create(&injector, params(Some(deploy_next), groups())).await;
    assert!(fourth.blue_phase);

    let color = crate::blue_green_color(context, store, &first).await.unwrap();
    assert_eq!(color, Some(BlueGreenColor::Blue));
    let color = crate::blue_green_color(context, store, &third).await.unwrap();
    assert_eq!(color, Some(BlueGreenColor::Green));
    assert_eq!(BlueGreenColor::Green.to_string(), "green");
}

#[tokio::test]
async fn no_phase_without_blue_green() {
    let (injector, _) = fixed_injector().await;
    let context = &injector.context;
    let store = &injector.store;
    let deploy = deploy(20, STAGE_ID, JobStatus::Succeeded);
    store.persist(context, deploy.clone()).await.unwrap();
    let groups = vec![(POD1, vec![role_entry(APP_SERVER, 1, 1.0, 50)])];
    let release = create(&injector, params(Some(deploy), groups)).await;
    assert!(!release.blue_phase);
    let color = crate::blue_green_color(context, store, &release).await.unwrap();
    assert_eq!(color, None);
}

#[tokio::test]
async fn previous_successful_release_lookup() {
    let (injector, _) = fixed_injector().await;
    let context = &injector.context;
    let store = &injector.store;
    let groups = || vec![(POD1, vec![role_entry(APP_SERVER, 1, 1.0, 50)])];

    let succeeded = deploy(1, STAGE_ID, JobStatus::Succeeded);
    store.persist(context, succeeded.clone()).await.unwrap();
    let previous = create(&injector, params(Some(succeeded.clone()), groups())).await;
    let failed = deploy(2, STAGE_ID, JobStatus::Failed);
    store.persist(context, failed.clone()).await.unwrap();
    let current = create(&injector, params(Some(failed), groups())).await;

    let found = crate::previous_successful_release(context, store, &current)
        .await
        .unwrap();
    assert_eq!(found, Some(previous.clone()));

    // A release is never its own predecessor.
    let found = crate::previous_successful_release(context, store, &previous)
        .await
        .unwrap();
    assert_eq!(found, None);

    // Releases whose deploys are gone or not succeeded are ignored.
    store.delete(context, &succeeded).await.unwrap();
    let found = crate::previous_successful_release(context, store, &current)
        .await
        .unwrap();
    assert_eq!(found, None);
}

#[tokio::test]
async fn clients_empty_without_deploy_groups() {
    let (injector, _) = fixed_injector().await;
    let release = Release {
        id: 42,
        project_id: PROJECT_ID,
        user_id: 1,
        deploy_id: None,
        git_sha: "abc".into(),
        git_ref: "master".into(),
        blue_phase: false,
        created_at: time::OffsetDateTime::now_utc(),
    };
    let clients = crate::clients(&injector.context, &injector, &release)
        .await
        .unwrap();
    assert!(clients.is_empty());
}

#[tokio::test]
async fn clients_return_scoped_queries() {
    let (injector, factory) = fixed_injector().await;
    let groups = vec![
        (
            POD1,
            vec![
                role_entry(APP_SERVER, 1, 1.0, 50),
                role_entry(RESQUE_WORKER, 1, 1.0, 50),
            ],
        ),
        (POD2, vec![role_entry(APP_SERVER, 1, 1.0, 50)]),
    ];
    let release = create(&injector, params(None, groups)).await;
    let mock = factory.cluster("fixture://pod-cluster");
    let labels = crate::pod_selector(release.id, POD1).labels();
    mock.append_pod("pod7", labels.clone());
    mock.append_pod("pod7", labels);
    mock.append_pod("pod8", crate::pod_selector(release.id + 1, POD2).labels());

    let clients = crate::clients(&injector.context, &injector, &release)
        .await
        .unwrap();
    assert_eq!(clients.len(), 2);
    let (client, query) = &clients[0];
    assert_eq!(query.namespace, "pod7");
    assert_eq!(
        query.label_selector,
        format!("release_id={},deploy_group_id={}", release.id, POD1),
    );
    assert_eq!(client.get_pods(query).await.unwrap().len(), 2);
    let (client, query) = &clients[1];
    assert_eq!(query.namespace, "pod8");
    assert!(client.get_pods(query).await.unwrap().is_empty());
}

#[tokio::test]
async fn clients_scope_queries_by_resource_namespace() {
    let (injector, _) = fixed_injector().await;
    let groups = vec![(POD1, vec![role_entry(STORAGE, 1, 1.0, 50)])];
    let release = create(&injector, params(None, groups)).await;
    let clients = crate::clients(&injector.context, &injector, &release)
        .await
        .unwrap();
    assert_eq!(clients[0].1.namespace, "storage");
}

#[tokio::test]
async fn clients_scope_stateful_sets_by_previous_release() {
    let (injector, _) = fixed_injector().await;
    let context = &injector.context;
    let store = &injector.store;
    let groups = || {
        vec![
            (POD1, vec![role_entry(STORAGE, 1, 1.0, 50)]),
            (POD2, vec![role_entry(APP_SERVER, 1, 1.0, 50)]),
        ]
    };

    let succeeded = deploy(1, STAGE_ID, JobStatus::Succeeded);
    store.persist(context, succeeded.clone()).await.unwrap();
    let previous = create(&injector, params(Some(succeeded), groups())).await;

    // Without history the current release is selected.
    let clients = crate::clients(context, &injector, &previous).await.unwrap();
    assert_eq!(
        clients[0].1.label_selector,
        format!("release_id={},deploy_group_id={}", previous.id, POD1),
    );

    let running = deploy(2, STAGE_ID, JobStatus::Running);
    store.persist(context, running.clone()).await.unwrap();
    let current = create(&injector, params(Some(running), groups())).await;
    let clients = crate::clients(context, &injector, &current).await.unwrap();
    assert_eq!(
        clients[0].1.label_selector,
        format!("release_id={},deploy_group_id={}", previous.id, POD1),
    );
    assert_eq!(
        clients[1].1.label_selector,
        format!("release_id={},deploy_group_id={}", current.id, POD2),
    );
}

#[tokio::test]
async fn clients_scope_mixed_groups_by_stateful_sets() {
    let (injector, _) = fixed_injector().await;
    let context = &injector.context;
    let store = &injector.store;
    let groups = || {
        vec![(
            POD1,
            vec![
                role_entry(APP_SERVER, 1, 1.0, 50),
                role_entry(STORAGE, 1, 1.0, 50),
            ],
        )]
    };

    let succeeded = deploy(1, STAGE_ID, JobStatus::Succeeded);
    store.persist(context, succeeded.clone()).await.unwrap();
    let previous = create(&injector, params(Some(succeeded), groups())).await;
    let running = deploy(2, STAGE_ID, JobStatus::Running);
    store.persist(context, running.clone()).await.unwrap();
    let current = create(&injector, params(Some(running), groups())).await;

    let clients = crate::clients(context, &injector, &current).await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].1.namespace, "storage");
    assert_eq!(
        clients[0].1.label_selector,
        format!("release_id={},deploy_group_id={}", previous.id, POD1),
    );
}

#[tokio::test]
async fn history_ignores_later_releases() {
    let (injector, _) = fixed_injector().await;
    let context = &injector.context;
    let store = &injector.store;
    let groups = || vec![(POD1, vec![role_entry(STORAGE, 1, 1.0, 50)])];

    let first_deploy = deploy(1, STAGE_ID, JobStatus::Succeeded);
    store.persist(context, first_deploy.clone()).await.unwrap();
    let first = create(&injector, params(Some(first_deploy), groups())).await;
    let second_deploy = deploy(2, STAGE_ID, JobStatus::Succeeded);
    store.persist(context, second_deploy.clone()).await.unwrap();
    let second = create(&injector, params(Some(second_deploy), groups())).await;

    let found = crate::previous_successful_release(context, store, &first)
        .await
        .unwrap();
    assert_eq!(found, None);
    let found = crate::previous_successful_release(context, store, &second)
        .await
        .unwrap();
    assert_eq!(found, Some(first.clone()));

    let clients = crate::clients(context, &injector, &first).await.unwrap();
    assert_eq!(
        clients[0].1.label_selector,
        format!("release_id={},deploy_group_id={}", first.id, POD1),
    );
}

#[tokio::test]
async fn release_pods_across_deploy_groups() {
    let (injector, factory) = fixed_injector().await;
    let groups = vec![
        (POD1, vec![role_entry(APP_SERVER, 1, 1.0, 50)]),
        (POD2, vec![role_entry(APP_SERVER, 1, 1.0, 50)]),
    ];
    let release = create(&injector, params(None, groups)).await;
    let mock = factory.cluster("fixture://pod-cluster");
    mock.append_pod("pod7", crate::pod_selector(release.id, POD1).labels());
    mock.append_pod("pod8", crate::pod_selector(release.id, POD2).labels());
    mock.append_pod("pod8", crate::pod_selector(release.id, POD2).labels());

    let pods = crate::release_pods(&injector.context, &injector, &release)
        .await
        .unwrap();
    assert_eq!(pods.total, 3);
    assert_eq!(pods.groups.len(), 2);
    assert_eq!(pods.groups[0].1.len(), 1);
    assert_eq!(pods.groups[1].1.len(), 2);
    assert_eq!(mock.queries().len(), 2);
}

#[tokio::test]
async fn release_links() {
    let (injector, _) = fixed_injector().await;
    let context = &injector.context;
    let store = &injector.store;
    let groups = vec![(POD1, vec![role_entry(APP_SERVER, 1, 1.0, 50)])];
    let release = create(&injector, params(None, groups)).await;

    let project = crate::release_project(context, store, &release).await.unwrap();
    let url = crate::release_url("http://www.test-url.com/", &project, &release);
    assert_eq!(
        url,
        format!("http://www.test-url.com/projects/foo/kubernetes/releases/{}", release.id),
    );

    for (id, project_id, git_sha) in [(1, 2, release.git_sha.as_str()), (2, 1, "other")] {
        let build = Build {
            id,
            project_id,
            git_sha: git_sha.into(),
            git_ref: "master".into(),
            docker_repo_digest: None,
        };
        store.persist(context, build).await.unwrap();
    }
    let builds = crate::release_builds(context, store, &release).await.unwrap();
    let ids: Vec<i64> = builds.iter().map(|build| build.id).collect();
    assert_eq!(ids, [1]);
}

#[tokio::test]
async fn release_user_survives_deletion() {
    let (injector, _) = fixed_injector().await;
    let context = &injector.context;
    let store = &injector.store;
    let groups = vec![(POD1, vec![role_entry(APP_SERVER, 1, 1.0, 50)])];
    let release = create(&injector, params(None, groups)).await;

    let user = crate::release_user(context, store, &release).await.unwrap();
    assert!(user.is_known());
    assert_eq!(user.name(), "Deployer");

    store.delete(context, &self::user()).await.unwrap();
    let user = crate::release_user(context, store, &release).await.unwrap();
    assert!(!user.is_known());
    assert_eq!(user.id(), 1);
    assert_eq!(user.name(), "Unknown user");
    assert_eq!(user.email(), None);
}

#[tokio::test]
async fn sqlite_store_rolls_back_failed_releases() {
    use shipcore_store::StoreFactory;
    use shipcore_store::StoreFactoryArgs;

    let (mut injector, _) = fixed_injector().await;
    let conf = serde_json::json!({"path": shipcore_store_sqlite::MEMORY_PATH});
    let store = shipcore_store_sqlite::SQLiteFactory
        .store(StoreFactoryArgs {
            conf: &conf,
            context: &injector.context,
        })
        .await
        .unwrap();
    fixed_db(&injector.context, &store).await;
    injector.store = store;

    let roles = vec![
        role_entry(APP_SERVER, 1, 1.0, 50),
        role_entry(FOREIGN_ROLE, 1, 1.0, 50),
    ];
    let error = composer(&injector)
        .create_release(&injector.context, params(None, vec![(POD1, roles)]))
        .await
        .unwrap_err();
    assert!(error.is::<shipcore_store::errors::RoleProjectMismatch>());
    assert_eq!(count(&injector).await, 0);

    let roles = vec![role_entry(APP_SERVER, 1, 1.0, 50)];
    create(&injector, params(None, vec![(POD1, roles)])).await;
    assert_eq!(count(&injector).await, 1);
}
