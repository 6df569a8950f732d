use crate::core::models::{
    candidate::{Candidate, Insert as CandidateInsert, Query as CandidateQuery},
    election::{Election, Insert as ElectionInsert, Query as ElectionQuery},
    user::{Insert as UserInsert, Query as UserQuery, User},
    vote::{Insert as VoteInsert, Query as VoteQuery, Tally},
};
use crate::core::ports::repository::{CandidateCommon, Common, ElectionCommon, Manager, Store, TxStore, UserCommon, VoteCommon};
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO users (roll_no, fullname, email, dept, password, salt, role, is_approved)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id",
        )
        .bind(user.roll_no)
        .bind(user.fullname)
        .bind(user.email)
        .bind(user.dept)
        .bind(user.password)
        .bind(user.salt)
        .bind(user.role.as_str())
        .bind(user.is_approved)
        .fetch_one(&mut self.executor)
        .await
        .map_err(|e| if is_unique_violation(&e) { Error::DuplicateRollNumber } else { e.into() })?;
        Ok(id)
    }

    async fn insert_if_absent(&mut self, user: UserInsert) -> Result<bool, Error> {
        let res = query(
            "INSERT INTO users (roll_no, fullname, email, dept, password, salt, role, is_approved)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (roll_no) DO NOTHING",
        )
        .bind(user.roll_no)
        .bind(user.fullname)
        .bind(user.email)
        .bind(user.dept)
        .bind(user.password)
        .bind(user.salt)
        .bind(user.role.as_str())
        .bind(user.is_approved)
        .execute(&mut self.executor)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        let user = query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(user)
    }

    async fn get_by_roll_no(&mut self, roll_no: &str) -> Result<Option<User>, Error> {
        let user = query_as("SELECT * FROM users WHERE roll_no = $1")
            .bind(roll_no)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(user)
    }

    async fn query(&mut self, query: UserQuery) -> Result<Vec<User>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM users WHERE 1 = 1");
        if let Some(role) = query.role_ne {
            stmt.push(" AND role <> ").push_bind(role.as_str());
        }
        stmt.push(" ORDER BY is_approved ASC, id ASC");
        let users = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(users)
    }

    async fn approve(&mut self, id: i32) -> Result<bool, Error> {
        let res = query("UPDATE users SET is_approved = TRUE WHERE id = $1 AND role <> 'admin'")
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let res = query("DELETE FROM users WHERE id = $1 AND role <> 'admin'").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected() > 0)
    }
}

impl<E> ElectionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, election: ElectionInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO elections (title, position, dept, start_time, end_time) VALUES ($1, $2, $3, $4, $5) RETURNING id")
            .bind(election.title)
            .bind(election.position)
            .bind(election.dept)
            .bind(election.start_time)
            .bind(election.end_time)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Election>, Error> {
        let election = query_as("SELECT * FROM elections WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(election)
    }

    async fn query(&mut self, query: ElectionQuery) -> Result<Vec<Election>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM elections WHERE 1 = 1");
        if let Some(dept) = query.dept_eq {
            stmt.push(" AND dept = ").push_bind(dept);
        }
        stmt.push(" ORDER BY id DESC");
        let elections = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(elections)
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let res = query("DELETE FROM elections WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected() > 0)
    }
}

impl<E> CandidateCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, candidate: CandidateInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO candidates (election_id, name, dept, roll_no, photo) VALUES ($1, $2, $3, $4, $5) RETURNING id")
            .bind(candidate.election_id)
            .bind(candidate.name)
            .bind(candidate.dept)
            .bind(candidate.roll_no)
            .bind(candidate.photo)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Candidate>, Error> {
        let candidate = query_as("SELECT * FROM candidates WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(candidate)
    }

    async fn query(&mut self, query: CandidateQuery) -> Result<Vec<Candidate>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM candidates WHERE 1 = 1");
        if let Some(election_id) = query.election_id_eq {
            stmt.push(" AND election_id = ").push_bind(election_id);
        }
        stmt.push(" ORDER BY id ASC");
        let candidates = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(candidates)
    }

    async fn delete_by_election(&mut self, election_id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM candidates WHERE election_id = $1")
            .bind(election_id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected())
    }
}

impl<E> VoteCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, vote: VoteInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO votes (student_id, election_id, candidate_id) VALUES ($1, $2, $3) RETURNING id")
            .bind(vote.student_id)
            .bind(vote.election_id)
            .bind(vote.candidate_id)
            .fetch_one(&mut self.executor)
            .await
            .map_err(|e| if is_unique_violation(&e) { Error::AlreadyVoted } else { e.into() })?;
        Ok(id)
    }

    async fn exists(&mut self, student_id: i32, election_id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT id FROM votes WHERE student_id = $1 AND election_id = $2)")
            .bind(student_id)
            .bind(election_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn voted_election_ids(&mut self, student_id: i32) -> Result<Vec<i32>, Error> {
        let ids = query_scalar("SELECT election_id FROM votes WHERE student_id = $1")
            .bind(student_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(ids)
    }

    async fn count(&mut self, query: VoteQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(id) FROM votes WHERE 1 = 1");
        if let Some(student_id) = query.student_id_eq {
            stmt.push(" AND student_id = ").push_bind(student_id);
        }
        if let Some(election_id) = query.election_id_eq {
            stmt.push(" AND election_id = ").push_bind(election_id);
        }
        let (n,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }

    async fn tally(&mut self, election_id: i32) -> Result<Vec<Tally>, Error> {
        let tallies = query_as(
            "
        SELECT c.id AS candidate_id, c.name AS name, COUNT(v.id) AS votes
        FROM candidates AS c
        LEFT JOIN votes AS v ON c.id = v.candidate_id
        WHERE c.election_id = $1
        GROUP BY c.id, c.name
        ORDER BY c.id",
        )
        .bind(election_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(tallies)
    }

    async fn delete_by_election(&mut self, election_id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM votes WHERE election_id = $1").bind(election_id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn delete_by_student(&mut self, student_id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM votes WHERE student_id = $1").bind(student_id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Common for PgSqlx<Transaction<'a, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Store for PgSqlx<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgSqlx<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type TxStore = PgSqlx<Transaction<'static, Postgres>>;

    async fn acquire(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn begin(&self) -> Result<Self::TxStore, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
