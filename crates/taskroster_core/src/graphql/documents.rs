//! Fixed GraphQL documents used by the repository layer.
//!
//! Lists are always requested with `order: updatedAt_DESC`; the client keeps
//! the server order as-is.

pub const PEOPLE_QUERY: &str = r#"
query getPeople {
  people(order: updatedAt_DESC) {
    edges {
      node {
        id
        name
      }
    }
  }
}
"#;

pub const TASKS_QUERY: &str = r#"
query getTasks($personId: ID) {
  tasks(
    where: { person: { have: { id: { equalTo: $personId } } } }
    order: updatedAt_DESC
  ) {
    count
    edges {
      node {
        id
        name
      }
    }
  }
}
"#;

pub const CREATE_PERSON_MUTATION: &str = r#"
mutation createPerson($name: String!) {
  createPerson(input: { fields: { name: $name } }) {
    person {
      id
    }
  }
}
"#;

pub const CREATE_TASK_MUTATION: &str = r#"
mutation createTask($name: String!, $personId: ID!) {
  createTask(input: { fields: { name: $name, person: { add: [$personId] } } }) {
    task {
      id
    }
  }
}
"#;

pub const UPDATE_PERSON_MUTATION: &str = r#"
mutation updatePerson($name: String!, $id: ID!) {
  updatePerson(input: { id: $id, fields: { name: $name } }) {
    person {
      id
    }
  }
}
"#;

pub const UPDATE_TASK_MUTATION: &str = r#"
mutation updateTask($name: String!, $id: ID!) {
  updateTask(input: { id: $id, fields: { name: $name } }) {
    task {
      id
    }
  }
}
"#;

pub const DELETE_PERSON_MUTATION: &str = r#"
mutation deletePerson($personId: ID!) {
  deletePerson(input: { id: $personId }) {
    person {
      id
    }
  }
}
"#;

pub const DELETE_TASK_MUTATION: &str = r#"
mutation deleteTask($taskId: ID!) {
  deleteTask(input: { id: $taskId }) {
    task {
      id
    }
  }
}
"#;
