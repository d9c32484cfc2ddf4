use crate::core::facets::{Entity, FacetKind, FacetValue};
use crate::core::filters::{FilterPredicate, ScalarFilter};
use crate::models::{Budget, Gender, GroupCandidate, MemberAvatar, MemberStatus, PreferenceProfile, UserId};
use crate::services::store::{CandidateStore, FetchQuery, SortOrder, StoreError, MEMBER_PREVIEW_LIMIT};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Row source for one entity
///
/// Table layout (enum columns are TEXT holding the wire names):
/// - `groups(id, title, location, date_from, date_to, gender, budget, path_picture, created_at)`
/// - `profiles(user_id, firstname, lastname, birthdate, gender, budget, available_from,
///   available_to, path_picture, created_at)`
/// - one relation table per facet, see [`FacetKind::relation`]
/// - `group_members(group_id, user_id, role, status)`, `ratings(rater_id, rated_id, value)`
struct Table {
    entity: Entity,
    from: &'static str,
    alias: &'static str,
    key: &'static str,
    columns: &'static str,
    window_start: &'static str,
    window_end: &'static str,
}

const GROUPS: Table = Table {
    entity: Entity::Group,
    from: "groups g",
    alias: "g",
    key: "id",
    columns: "g.id, g.title, g.location, g.date_from, g.date_to, g.gender, g.budget, \
              g.path_picture, g.created_at",
    window_start: "date_from",
    window_end: "date_to",
};

const PROFILES: Table = Table {
    entity: Entity::Profile,
    from: "profiles p",
    alias: "p",
    key: "user_id",
    columns: "p.user_id, p.firstname, p.lastname, p.birthdate, p.gender, p.budget, \
              p.available_from, p.available_to, p.path_picture, p.created_at",
    window_start: "available_from",
    window_end: "available_to",
};

/// PostgreSQL-backed candidate store
///
/// Predicates are rendered to SQL with bound parameters; facet clauses become
/// `EXISTS` sub-selects against the relation resolved through the facet table.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Facet values for the given owners, for every facet the entity carries
    async fn load_facets(
        &self,
        entity: Entity,
        owner_ids: &[i64],
    ) -> Result<Vec<(i64, FacetValue)>, StoreError> {
        let mut values = Vec::new();
        if owner_ids.is_empty() {
            return Ok(values);
        }

        for kind in FacetKind::ALL {
            let Some(relation) = kind.relation(entity) else {
                continue;
            };

            let sql = format!(
                "SELECT {owner} AS owner_id, {column}::text AS value FROM {table} WHERE {owner} = ANY($1)",
                owner = relation.owner_column,
                column = relation.value_column,
                table = relation.table,
            );

            let rows = sqlx::query(&sql).bind(owner_ids).fetch_all(&self.pool).await?;
            for row in rows {
                let owner: i64 = row.try_get("owner_id")?;
                let raw: String = row.try_get("value")?;
                values.push((owner, kind.parse_value(&raw)?));
            }
        }

        Ok(values)
    }

    /// Up to [`MEMBER_PREVIEW_LIMIT`] accepted members per group
    async fn load_members(&self, group_ids: &[i64]) -> Result<HashMap<i64, Vec<MemberAvatar>>, StoreError> {
        let mut members: HashMap<i64, Vec<MemberAvatar>> = HashMap::new();
        if group_ids.is_empty() {
            return Ok(members);
        }

        let query = r#"
            SELECT group_id, path_picture, role
            FROM (
                SELECT gm.group_id, p.path_picture, gm.role::text AS role,
                       ROW_NUMBER() OVER (PARTITION BY gm.group_id ORDER BY gm.user_id) AS rn
                FROM group_members gm
                JOIN profiles p ON p.user_id = gm.user_id
                WHERE gm.status::text = $3 AND gm.group_id = ANY($1)
            ) ranked
            WHERE rn <= $2
            ORDER BY group_id, rn
        "#;

        let rows = sqlx::query(query)
            .bind(group_ids)
            .bind(MEMBER_PREVIEW_LIMIT as i64)
            .bind(MemberStatus::Accepted.as_str())
            .fetch_all(&self.pool)
            .await?;

        for row in rows {
            let group_id: i64 = row.try_get("group_id")?;
            let role: String = row.try_get("role")?;
            members.entry(group_id).or_default().push(MemberAvatar {
                path_picture: row.try_get("path_picture")?,
                role: role.parse()?,
            });
        }

        Ok(members)
    }

    async fn hydrate_groups(&self, mut groups: Vec<GroupCandidate>) -> Result<Vec<GroupCandidate>, StoreError> {
        let ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
        let facets = self.load_facets(Entity::Group, &ids).await?;
        let mut members = self.load_members(&ids).await?;

        for group in &mut groups {
            if let Some(preview) = members.remove(&group.id) {
                group.members = preview;
            }
        }
        attach(&mut groups, facets, |g| g.id);

        Ok(groups)
    }

    async fn hydrate_profiles(&self, mut profiles: Vec<PreferenceProfile>) -> Result<Vec<PreferenceProfile>, StoreError> {
        let ids: Vec<i64> = profiles.iter().map(|p| p.user_id).collect();
        let facets = self.load_facets(Entity::Profile, &ids).await?;
        attach(&mut profiles, facets, |p| p.user_id);

        Ok(profiles)
    }
}

/// Accepts facet values loaded from a relation table
trait FacetSink {
    fn add_facet(&mut self, value: FacetValue);
}

impl FacetSink for GroupCandidate {
    fn add_facet(&mut self, value: FacetValue) {
        match value {
            FacetValue::TravelType(v) => {
                self.travel_types.insert(v);
            }
            FacetValue::Lodging(v) => {
                self.lodgings.insert(v);
            }
            FacetValue::Language(v) => {
                self.languages.insert(v);
            }
            FacetValue::AgeRange(v) => {
                self.age_ranges.insert(v);
            }
            FacetValue::Interest(_) | FacetValue::TripDuration(_) => {}
        }
    }
}

impl FacetSink for PreferenceProfile {
    fn add_facet(&mut self, value: FacetValue) {
        match value {
            FacetValue::TravelType(v) => {
                self.travel_types.insert(v);
            }
            FacetValue::Lodging(v) => {
                self.lodgings.insert(v);
            }
            FacetValue::Language(v) => {
                self.languages.insert(v);
            }
            FacetValue::Interest(v) => {
                self.interests.insert(v);
            }
            FacetValue::TripDuration(v) => {
                self.trip_durations.insert(v);
            }
            FacetValue::AgeRange(_) => {}
        }
    }
}

fn attach<T: FacetSink>(owners: &mut [T], facets: Vec<(i64, FacetValue)>, key: impl Fn(&T) -> i64) {
    let positions: HashMap<i64, usize> = owners
        .iter()
        .enumerate()
        .map(|(i, owner)| (key(owner), i))
        .collect();

    for (owner_id, value) in facets {
        if let Some(&i) = positions.get(&owner_id) {
            owners[i].add_facet(value);
        }
    }
}

fn group_from_row(row: &PgRow) -> Result<GroupCandidate, StoreError> {
    let gender: String = row.try_get("gender")?;
    let budget: String = row.try_get("budget")?;

    Ok(GroupCandidate {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        location: row.try_get("location")?,
        date_from: row.try_get("date_from")?,
        date_to: row.try_get("date_to")?,
        gender: gender.parse()?,
        budget: budget.parse()?,
        path_picture: row.try_get("path_picture")?,
        age_ranges: BTreeSet::new(),
        travel_types: BTreeSet::new(),
        lodgings: BTreeSet::new(),
        languages: BTreeSet::new(),
        members: Vec::new(),
        created_at: row.try_get("created_at")?,
    })
}

fn profile_from_row(row: &PgRow) -> Result<PreferenceProfile, StoreError> {
    let gender: Option<String> = row.try_get("gender")?;
    let budget: Option<String> = row.try_get("budget")?;

    Ok(PreferenceProfile {
        user_id: row.try_get("user_id")?,
        firstname: row.try_get("firstname")?,
        lastname: row.try_get("lastname")?,
        birthdate: row.try_get("birthdate")?,
        gender: gender.map(|g| g.parse::<Gender>()).transpose()?,
        budget: budget.map(|b| b.parse::<Budget>()).transpose()?,
        available_from: row.try_get("available_from")?,
        available_to: row.try_get("available_to")?,
        path_picture: row.try_get("path_picture")?,
        travel_types: BTreeSet::new(),
        lodgings: BTreeSet::new(),
        languages: BTreeSet::new(),
        interests: BTreeSet::new(),
        trip_durations: BTreeSet::new(),
        created_at: row.try_get("created_at")?,
    })
}

/// Render a predicate as a boolean SQL expression over `table`
fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &FilterPredicate, table: &Table) {
    match predicate {
        FilterPredicate::All(clauses) => push_joined(qb, clauses, " AND ", "TRUE", table),
        FilterPredicate::Any(clauses) => push_joined(qb, clauses, " OR ", "FALSE", table),
        FilterPredicate::Has(value) => match value.kind().relation(table.entity) {
            Some(relation) => {
                qb.push(format!(
                    "EXISTS (SELECT 1 FROM {} f WHERE f.{} = {}.{} AND f.{}::text = ",
                    relation.table, relation.owner_column, table.alias, table.key, relation.value_column
                ));
                qb.push_bind(value.as_str());
                qb.push(")");
            }
            // no relation for this entity: nothing can match
            None => {
                qb.push("FALSE");
            }
        },
        FilterPredicate::Scalar(filter) => push_scalar(qb, filter, table),
    }
}

fn push_joined(
    qb: &mut QueryBuilder<'_, Postgres>,
    clauses: &[FilterPredicate],
    separator: &str,
    empty: &str,
    table: &Table,
) {
    if clauses.is_empty() {
        qb.push(empty);
        return;
    }

    qb.push("(");
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_predicate(qb, clause, table);
    }
    qb.push(")");
}

fn push_scalar(qb: &mut QueryBuilder<'_, Postgres>, filter: &ScalarFilter, table: &Table) {
    let alias = table.alias;
    match (filter, table.entity) {
        (ScalarFilter::LocationContains(needle), Entity::Group) => {
            qb.push(format!("strpos({alias}.location, "));
            qb.push_bind(needle.clone());
            qb.push(") > 0");
        }
        (ScalarFilter::WindowStartsOnOrAfter(date), _) => {
            qb.push(format!("{alias}.{} >= ", table.window_start));
            qb.push_bind(*date);
        }
        (ScalarFilter::WindowEndsOnOrBefore(date), _) => {
            qb.push(format!("{alias}.{} <= ", table.window_end));
            qb.push_bind(*date);
        }
        (ScalarFilter::BudgetIs(budget), _) => {
            qb.push(format!("{alias}.budget::text = "));
            qb.push_bind(budget.as_str());
        }
        (ScalarFilter::GroupGenderIs(gender), Entity::Group) => {
            qb.push(format!("{alias}.gender::text = "));
            qb.push_bind(gender.as_str());
        }
        (ScalarFilter::ProfileGenderIs(gender), Entity::Profile) => {
            qb.push(format!("{alias}.gender::text = "));
            qb.push_bind(gender.as_str());
        }
        (
            ScalarFilter::LocationContains(_)
            | ScalarFilter::GroupGenderIs(_)
            | ScalarFilter::ProfileGenderIs(_),
            _,
        ) => {
            qb.push("FALSE");
        }
    }
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, predicate: &FilterPredicate, exclude_ids: &[i64], table: &Table) {
    qb.push(" WHERE ");
    push_predicate(qb, predicate, table);

    if !exclude_ids.is_empty() {
        qb.push(format!(" AND NOT ({}.{} = ANY(", table.alias, table.key));
        qb.push_bind(exclude_ids.to_vec());
        qb.push("))");
    }
}

fn select_query(query: &FetchQuery, table: &Table) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", table.columns, table.from));
    push_where(&mut qb, &query.predicate, &query.exclude_ids, table);

    let order = match query.order {
        SortOrder::CreatedDesc => format!(
            " ORDER BY {a}.created_at DESC, {a}.{k} DESC",
            a = table.alias,
            k = table.key
        ),
        SortOrder::WindowStartAsc => format!(
            " ORDER BY {a}.{w} ASC NULLS LAST, {a}.{k} ASC",
            a = table.alias,
            w = table.window_start,
            k = table.key
        ),
    };
    qb.push(order);

    qb.push(" LIMIT ");
    qb.push_bind(query.limit as i64);
    qb.push(" OFFSET ");
    qb.push_bind(query.offset as i64);
    qb
}

fn count_query(predicate: &FilterPredicate, table: &Table) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) AS total FROM {}", table.from));
    push_where(&mut qb, predicate, &[], table);
    qb
}

#[async_trait]
impl CandidateStore for PostgresStore {
    async fn load_profile(&self, user_id: UserId) -> Result<Option<PreferenceProfile>, StoreError> {
        let query = format!("SELECT {} FROM {} WHERE p.user_id = $1", PROFILES.columns, PROFILES.from);

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let profile = profile_from_row(&row)?;
                let mut hydrated = self.hydrate_profiles(vec![profile]).await?;
                Ok(hydrated.pop())
            }
            None => Ok(None),
        }
    }

    async fn fetch_groups(&self, query: &FetchQuery) -> Result<Vec<GroupCandidate>, StoreError> {
        let mut qb = select_query(query, &GROUPS);
        let rows = qb.build().fetch_all(&self.pool).await?;

        let groups = rows
            .iter()
            .map(group_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} groups", groups.len());

        self.hydrate_groups(groups).await
    }

    async fn count_groups(&self, predicate: &FilterPredicate) -> Result<u64, StoreError> {
        let mut qb = count_query(predicate, &GROUPS);
        let row = qb.build().fetch_one(&self.pool).await?;
        let total: i64 = row.try_get("total")?;
        Ok(total.max(0) as u64)
    }

    async fn fetch_profiles(&self, query: &FetchQuery) -> Result<Vec<PreferenceProfile>, StoreError> {
        let mut qb = select_query(query, &PROFILES);
        let rows = qb.build().fetch_all(&self.pool).await?;

        let profiles = rows
            .iter()
            .map(profile_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} profiles", profiles.len());

        self.hydrate_profiles(profiles).await
    }

    async fn count_profiles(&self, predicate: &FilterPredicate) -> Result<u64, StoreError> {
        let mut qb = count_query(predicate, &PROFILES);
        let row = qb.build().fetch_one(&self.pool).await?;
        let total: i64 = row.try_get("total")?;
        Ok(total.max(0) as u64)
    }

    async fn ratings_received(&self, user_id: UserId) -> Result<Vec<i16>, StoreError> {
        let query = r#"
            SELECT value::smallint AS value
            FROM ratings
            WHERE rated_id = $1
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| row.try_get::<i16, _>("value").map_err(StoreError::from))
            .collect()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filters::FilterBuilder;
    use crate::models::{Interest, TravelType};
    use chrono::NaiveDate;

    fn render(predicate: &FilterPredicate, table: &Table) -> String {
        let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new("");
        push_predicate(&mut qb, predicate, table);
        qb.sql().to_string()
    }

    #[test]
    fn test_empty_predicate_renders_true() {
        assert_eq!(render(&FilterPredicate::match_all(), &GROUPS), "TRUE");
        assert_eq!(render(&FilterPredicate::Any(vec![]), &GROUPS), "FALSE");
    }

    #[test]
    fn test_facet_clause_renders_exists_per_value() {
        let predicate = FilterBuilder::new()
            .facet(&[TravelType::Hiking, TravelType::Beach])
            .scalar(ScalarFilter::BudgetIs(Budget::Low))
            .build();

        let sql = render(&predicate, &GROUPS);
        assert_eq!(
            sql,
            "((EXISTS (SELECT 1 FROM group_travel_types f WHERE f.group_id = g.id AND f.travel_type::text = $1) \
             OR EXISTS (SELECT 1 FROM group_travel_types f WHERE f.group_id = g.id AND f.travel_type::text = $2)) \
             AND g.budget::text = $3)"
        );
    }

    #[test]
    fn test_inapplicable_facet_renders_false() {
        let predicate = FilterBuilder::new().facet(&[Interest::Nature]).build();

        assert_eq!(render(&predicate, &GROUPS), "((FALSE))");
        assert!(render(&predicate, &PROFILES).contains("profile_interests"));
    }

    #[test]
    fn test_window_scalars_follow_entity_columns() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let predicate = FilterBuilder::new()
            .scalar(ScalarFilter::WindowStartsOnOrAfter(date))
            .build();

        assert_eq!(render(&predicate, &GROUPS), "(g.date_from >= $1)");
        assert_eq!(render(&predicate, &PROFILES), "(p.available_from >= $1)");
    }

    #[test]
    fn test_select_query_orders_and_pages() {
        let query = FetchQuery::latest(5).offset(10).exclude([7]);
        let qb = select_query(&query, &PROFILES);
        let sql = qb.sql();

        assert!(sql.starts_with("SELECT p.user_id"));
        assert!(sql.contains("WHERE TRUE AND NOT (p.user_id = ANY($1))"));
        assert!(sql.contains("ORDER BY p.created_at DESC, p.user_id DESC"));
        assert!(sql.ends_with("LIMIT $2 OFFSET $3"));
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_health_check() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
        let store = PostgresStore::from_settings(&url, Some(2), Some(1), None, None)
            .await
            .expect("Failed to connect");

        assert!(store.health_check().await.unwrap());
    }
}
